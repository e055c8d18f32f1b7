//! The cart state container.
//!
//! [`CartStore`] owns the in-memory [`Cart`], mirrors every change to a
//! [`KeyValueStorage`] backend through a background writer, and lets any
//! number of consumers read or subscribe to the current cart.
//!
//! # Lifecycle
//!
//! 1. [`CartStore::new`] creates an empty, not-yet-hydrated store and starts
//!    its writer.
//! 2. [`CartStore::load`] hydrates it once from storage. Mutations made before
//!    this point stay in memory only and are replaced by the loaded cart.
//! 3. Mutations apply synchronously; the post-mutation snapshot is queued for
//!    the writer while the state lock is still held, so writes follow
//!    mutation order.
//! 4. [`CartStore::shutdown`] writes anything pending and stops the writer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use go_marketplace_core::{LineItem, ProductDescriptor};

use crate::cart::{AddOutcome, Cart, DecrementOutcome};
use crate::error::{CartError, Result};
use crate::payload;
use crate::storage::KeyValueStorage;
use crate::writer::Writer;

/// Shared handle to a cart.
///
/// Cloning is cheap; all clones see and mutate the same cart.
pub struct CartStore<S> {
    inner: Arc<CartStoreInner<S>>,
}

struct CartStoreInner<S> {
    storage: Arc<S>,
    key: String,
    state: watch::Sender<Cart>,
    hydrated: AtomicBool,
    load_started: AtomicBool,
    writer: Writer,
}

impl<S> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("hydrated", &self.inner.hydrated.load(Ordering::Acquire))
            .field("items", &self.inner.state.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create an empty store persisting under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoRuntime`] when called outside a tokio runtime.
    pub fn new(storage: S, key: impl Into<String>) -> Result<Self> {
        let storage = Arc::new(storage);
        let key = key.into();
        let writer = Writer::spawn(Arc::clone(&storage), key.clone())?;
        let (state, _) = watch::channel(Cart::new());

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key,
                state,
                hydrated: AtomicBool::new(false),
                load_started: AtomicBool::new(false),
                writer,
            }),
        })
    }

    /// Create a store and hydrate it from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if no runtime is available or the storage read fails.
    /// A malformed payload is not an error; it yields an empty cart.
    pub async fn open(storage: S, key: impl Into<String>) -> Result<Self> {
        let store = Self::new(storage, key)?;
        store.load().await?;
        Ok(store)
    }

    /// Hydrate the cart from storage. Only the first call does anything.
    ///
    /// A missing or malformed payload leaves the cart empty. If the read
    /// itself fails the cart is also left empty and marked hydrated, so later
    /// mutations still persist; the failure is returned for the caller to
    /// log or ignore.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AlreadyLoaded`] on a second call and
    /// [`CartError::Storage`] if the storage read fails.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    pub async fn load(&self) -> Result<()> {
        if self.inner.load_started.swap(true, Ordering::AcqRel) {
            return Err(CartError::AlreadyLoaded);
        }

        let (cart, outcome) = match self.inner.storage.get_item(&self.inner.key).await {
            Ok(Some(body)) => match payload::decode(&body) {
                Ok(cart) => {
                    info!(items = cart.len(), "Loaded persisted cart");
                    (cart, Ok(()))
                }
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable persisted cart");
                    (Cart::new(), Ok(()))
                }
            },
            Ok(None) => {
                debug!("No persisted cart");
                (Cart::new(), Ok(()))
            }
            Err(e) => {
                error!(error = %e, "Failed to read persisted cart");
                (Cart::new(), Err(CartError::Storage(e)))
            }
        };

        let hydrated = &self.inner.hydrated;
        self.inner.state.send_modify(|current| {
            *current = cart;
            hydrated.store(true, Ordering::Release);
        });

        outcome
    }

    /// Add one unit of a product, appending a new line if needed.
    ///
    /// If the product is already in the cart only its quantity changes; the
    /// display fields stored with the first add are kept.
    pub fn add_to_cart(&self, descriptor: ProductDescriptor) {
        let id = descriptor.id.clone();
        let mut outcome = AddOutcome::Appended;
        self.mutate(|cart| {
            outcome = cart.add(descriptor);
            true
        });
        debug!(product_id = %id, ?outcome, "Added to cart");
    }

    /// Add one unit to an existing line. Unknown ids are ignored.
    pub fn increment(&self, id: &str) {
        if !self.mutate(|cart| cart.increment(id)) {
            debug!(product_id = %id, "Increment ignored, product not in cart");
        }
    }

    /// Remove one unit from a line, dropping the line at zero. Unknown ids
    /// are ignored.
    pub fn decrement(&self, id: &str) {
        let mut outcome = DecrementOutcome::NotFound;
        self.mutate(|cart| {
            outcome = cart.decrement(id);
            outcome.changed()
        });
        debug!(product_id = %id, ?outcome, "Decremented");
    }

    /// Snapshot of the current line items, in cart order.
    #[must_use]
    pub fn products(&self) -> Vec<LineItem> {
        self.inner.state.borrow().items().to_vec()
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Read the current cart without cloning it.
    ///
    /// The state lock is held while `f` runs; `f` must not mutate this store.
    pub fn with_cart<R>(&self, f: impl FnOnce(&Cart) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver is notified only when a mutation or `load` changes the
    /// cart; no-op increments and decrements do not wake it.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Whether `load` has completed.
    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        self.inner.hydrated.load(Ordering::Acquire)
    }

    /// Storage key this cart persists under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Wait until every change made so far has been written to storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::WriterStopped`] after `shutdown`.
    pub async fn flush(&self) -> Result<()> {
        self.inner.writer.flush().await
    }

    /// Write pending changes and stop persisting.
    ///
    /// The in-memory cart stays readable and mutable, but later changes are
    /// no longer written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::WriterStopped`] if the writer was already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        self.inner.writer.shutdown().await?;
        info!(key = %self.inner.key, "Cart store shut down");
        Ok(())
    }

    /// Apply `f` under the state lock. When it reports a change, subscribers
    /// are notified and, once hydrated, the new cart is queued for writing.
    fn mutate(&self, f: impl FnOnce(&mut Cart) -> bool) -> bool {
        let inner = &self.inner;
        inner.state.send_if_modified(|cart| {
            let changed = f(cart);
            if changed && inner.hydrated.load(Ordering::Acquire) {
                inner.writer.save(cart.clone());
            }
            changed
        })
    }
}

//! Session-scoped access to the cart.
//!
//! A [`CartContext`] is the slot UI consumers ask for the cart. The
//! application installs a store when the session starts and tears it down
//! when the session ends; asking in between yields a cloneable handle, asking
//! outside that window yields [`CartError::OutsideContext`].

use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use crate::error::{CartError, Result};
use crate::storage::KeyValueStorage;
use crate::store::CartStore;

/// Slot holding the session's cart store.
pub struct CartContext<S> {
    slot: RwLock<Option<CartStore<S>>>,
}

impl<S> Default for CartContext<S> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<S: KeyValueStorage> CartContext<S> {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the session's store, returning any store it replaces.
    pub fn install(&self, store: CartStore<S>) -> Option<CartStore<S>> {
        let previous = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(store);
        if previous.is_some() {
            warn!("Replaced an active cart store");
        }
        previous
    }

    /// Handle to the installed store.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutsideContext`] if no store is installed.
    pub fn cart(&self) -> Result<CartStore<S>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(CartError::OutsideContext)
    }

    /// Whether a store is installed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Remove the installed store and shut it down.
    ///
    /// Handles obtained earlier keep working in memory but no longer persist.
    /// Returns `None` if nothing was installed.
    pub async fn teardown(&self) -> Option<CartStore<S>> {
        let store = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;

        if let Err(e) = store.shutdown().await {
            warn!(error = %e, "Cart store was already shut down");
        }
        info!(key = %store.storage_key(), "Cart context torn down");
        Some(store)
    }
}

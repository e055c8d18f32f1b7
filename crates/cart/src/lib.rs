//! GoMarketplace Cart - Persistent shopping-cart state container.
//!
//! The cart is an ordered list of line items, unique by product id, kept in
//! memory and mirrored to a key-value storage backend. UI consumers read it,
//! subscribe to it, and change it through three operations: add, increment
//! and decrement.
//!
//! # Architecture
//!
//! - [`Cart`] - the pure in-memory model
//! - [`CartStore`] - shared handle owning the cart, its subscribers and a
//!   single background writer that persists post-mutation snapshots in order
//! - [`CartContext`] - session slot handing out store handles
//! - [`storage`] - the [`KeyValueStorage`] trait with memory and file backends
//!
//! # Example
//!
//! ```no_run
//! use go_marketplace_cart::{CartStore, MemoryStorage, DEFAULT_STORAGE_KEY};
//!
//! # async fn demo() -> Result<(), go_marketplace_cart::CartError> {
//! let store = CartStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY).await?;
//! store.increment("p1"); // not in the cart yet, ignored
//! store.flush().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod payload;
pub mod storage;
pub mod store;
mod writer;

pub use cart::{AddOutcome, Cart, DecrementOutcome, DuplicateProduct};
pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_DIR, DEFAULT_STORAGE_KEY};
pub use context::CartContext;
pub use error::{CartError, StorageError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::CartStore;

pub use go_marketplace_core::{LineItem, Price, ProductDescriptor, ProductId};

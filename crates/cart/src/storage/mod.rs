//! Key-value storage backends for the persisted cart.
//!
//! The cart only needs an asynchronous string-keyed store with get/set.
//! Backends:
//! - [`MemoryStorage`] - in-process map, for tests and ephemeral sessions
//! - [`FileStorage`] - one file per key under a directory

use std::future::Future;
use std::sync::Arc;

use crate::error::StorageError;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Asynchronous string-keyed storage.
///
/// Values are opaque strings. Implementations must be safe to share across
/// tasks; the cart reads from one task and writes from its background writer.
pub trait KeyValueStorage: Send + Sync + 'static {
    /// Fetch the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the value under `key`. Deleting a missing key succeeds.
    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<S: KeyValueStorage> KeyValueStorage for Arc<S> {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key).await
    }
}

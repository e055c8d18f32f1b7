//! Error types for the cart and its storage backends.

use thiserror::Error;

/// Errors raised by a [`KeyValueStorage`](crate::storage::KeyValueStorage)
/// backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be used with this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests right now.
    ///
    /// The built-in backends never return this. It is for external
    /// [`KeyValueStorage`](crate::KeyValueStorage) implementations, such as a
    /// remote or platform store that is offline, to report a transient failure
    /// that is not an I/O error on a local path.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`CartStore`](crate::CartStore) and
/// [`CartContext`](crate::CartContext).
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart was requested from a context with no installed store.
    #[error("cart accessed outside of an active cart context")]
    OutsideContext,

    /// `load` was called a second time.
    #[error("cart has already been loaded")]
    AlreadyLoaded,

    /// The store was created outside of a tokio runtime.
    #[error("cart store requires a running tokio runtime")]
    NoRuntime,

    /// The background writer is gone (store shut down).
    #[error("cart persistence writer has stopped")]
    WriterStopped,

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        assert_eq!(
            CartError::OutsideContext.to_string(),
            "cart accessed outside of an active cart context"
        );

        let err = CartError::from(StorageError::InvalidKey("..".to_string()));
        assert_eq!(err.to_string(), "storage error: invalid storage key: \"..\"");
    }

    #[test]
    fn test_unavailable_from_external_backend() {
        let err = CartError::from(StorageError::Unavailable("keychain locked".to_string()));
        assert!(matches!(err, CartError::Storage(StorageError::Unavailable(_))));
        assert_eq!(
            err.to_string(),
            "storage error: storage unavailable: keychain locked"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = StorageError::Io {
            key: "cart".to_string(),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("disk full"));
    }
}

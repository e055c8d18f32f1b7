use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

use super::KeyValueStorage;
use crate::error::StorageError;

/// Storage that keeps one file per key under a root directory.
///
/// Keys are form-urlencoded into file names, so `@GoMarketPlace:products`
/// lands in `%40GoMarketPlace%3Aproducts`. Writes go to a temporary sibling
/// file which is then renamed over the target, so a crash mid-write leaves
/// the previous value in place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this storage.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path holding the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for keys that do not map to a
    /// plain file name (empty, `.` or `..`).
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let name: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        if name.is_empty() || name == "." || name == ".." {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(name))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_error(key))?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, value).await.map_err(io_error(key))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(key)(e));
        }

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

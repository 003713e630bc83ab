//! File-backed key-value store.
//!
//! One JSON value per key as `<root>/<key>.json`, written via temp file +
//! rename so a record is never observed half-written. Keys map directly to
//! file names; every key built by this crate stays filesystem-safe as long
//! as user ids do.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::store::KeyValueStore;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write, so constructing a store never touches the disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

fn io_fault(key: &str, source: std::io::Error) -> DataError {
    DataError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_fault(key, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_fault(key, e))?;

        // Temp file in the same directory so the rename stays atomic.
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(|e| io_fault(key, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_fault(key, e))?;

        debug!("wrote {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_fault(key, e)),
        }
    }
}

//! Key-value store contract and in-memory backend.
//!
//! Managers perform unserialized read-modify-write cycles on top of this
//! contract. The single backend lock protects individual operations only;
//! two concurrent writers to the same record can still lose an update.
//! The intended caller is a single UI task issuing one write at a time.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{DataError, Result};

/// Asynchronous string-keyed, string-valued persistent store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Best-effort batch removal. Not a transaction: a fault partway
    /// through may leave some keys removed and others not.
    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}

/// In-memory backend.
///
/// The default test double, and a valid production backend for ephemeral
/// sessions that should not touch disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DataError::LockPoisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DataError::LockPoisoned("write"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| DataError::LockPoisoned("remove"))?;
        entries.remove(key);
        Ok(())
    }
}

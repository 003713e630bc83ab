//! Shared JSON record read/write helpers.
//!
//! Every record is one JSON blob under one store key; these helpers keep
//! the parse/serialize fault mapping in a single place.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::store::KeyValueStore;

/// Read and parse the record under `key`, or `None` if absent.
pub(crate) async fn read_record<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(raw) => {
            let value = serde_json::from_str(&raw).map_err(|source| {
                warn!("record '{}' failed to parse: {}", key, source);
                DataError::Parse {
                    key: key.to_string(),
                    source,
                }
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Serialize `value` and write it under `key`, replacing any prior record.
pub(crate) async fn write_record<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|source| DataError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw).await?;
    debug!("record '{}' written", key);
    Ok(())
}

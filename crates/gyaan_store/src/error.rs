//! Error types for the data layer.
//!
//! Store faults are explicit rather than swallowed: read paths return `Err`
//! on a backend or parse fault and `None`/empty/defaults on genuine
//! absence, so callers can tell "no data yet" apart from "read failed".
//! Call sites that want the old treat-as-empty behavior can still collapse
//! the two with `unwrap_or_default()`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to serialize record '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse record '{key}': {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O fault for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("no study plan found for user '{0}'")]
    NoStudyPlan(String),
}

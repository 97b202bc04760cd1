//! # Store Error Types
//!
//! Error types for key-value store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / quota check                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the key and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PersistenceUnavailable (tally-core) ← Crosses the gateway boundary    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Commit::persistence ← Cart keeps going in memory                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::PersistenceUnavailable;
use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The write would push the store past its byte quota.
    ///
    /// ## When This Occurs
    /// - `MemoryStore` built with `with_quota` and the new value is too big
    #[error("Quota exceeded writing '{key}': {required} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    /// The key cannot be used by this store.
    ///
    /// ## When This Occurs
    /// - Empty key
    /// - `FileStore` key with a path separator or a leading dot
    #[error("Invalid key '{0}'")]
    InvalidKey(String),

    /// File system failure.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created
    /// - Permissions issue, disk full
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(key: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            key: key.into(),
            source,
        }
    }
}

impl From<StoreError> for PersistenceUnavailable {
    fn from(err: StoreError) -> Self {
        PersistenceUnavailable::new(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_persistence_unavailable() {
        let err = StoreError::QuotaExceeded {
            key: "tally.cart.session".to_string(),
            required: 120,
            quota: 64,
        };
        let unavailable: PersistenceUnavailable = err.into();
        assert_eq!(
            unavailable.to_string(),
            "Persistence unavailable: Quota exceeded writing 'tally.cart.session': 120 bytes needed, 64 allowed"
        );
    }
}

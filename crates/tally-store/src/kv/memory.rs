//! # Memory Store
//!
//! In-process key-value store. Used by tests and by the terminal app when no
//! data directory is wanted.
//!
//! ## Quota
//! A store built with [`MemoryStore::with_quota`] behaves like a small
//! browser store: a write that would push the summed size of every key and
//! value past the quota fails with [`StoreError::QuotaExceeded`] and leaves
//! the previous value in place.

use std::collections::HashMap;

use tracing::debug;

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding at most `quota` bytes of keys plus values.
    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            let required = self.used_bytes() - replaced + key.len() + value.len();
            if required > quota {
                debug!(key, required, quota, "Memory store quota exceeded");
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.set("", "x"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        // "k" + 9 bytes = 10
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "123456789").unwrap();
        // Overwriting with the same size still fits
        store.set("k", "abcdefghi").unwrap();
        assert_eq!(store.used_bytes(), 10);

        let err = store.set("k", "abcdefghij").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                required: 11,
                quota: 10,
                ..
            }
        ));
        // Old value survives a rejected write
        assert_eq!(store.get("k").unwrap().as_deref(), Some("abcdefghi"));
    }
}

//! # Key-Value Stores
//!
//! String-keyed, string-valued storage backends for the snapshot gateway.
//!
//! ## Store Abstraction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Key-Value Store Abstraction                          │
//! │                                                                         │
//! │  PersistenceGateway                                                    │
//! │       │                                                                 │
//! │       │  store.set("tally.cart.session", json)                         │
//! │       ▼                                                                 │
//! │  KeyValueStore                                                         │
//! │  ├── get(&self, key)          → Option<String>                         │
//! │  ├── set(&mut self, key, val) → overwrite                              │
//! │  └── remove(&mut self, key)   → idempotent                             │
//! │       │                                                                 │
//! │       ├──────────────────────┬──────────────────────┐                   │
//! │       ▼                      ▼                      ▼                   │
//! │  MemoryStore            FileStore             Box<dyn ...>             │
//! │  (tests, quota)         (one file per key)    (chosen at startup)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - HashMap with an optional byte quota
//! - [`FileStore`] - One file per key under a data directory

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;

/// Minimal key-value contract.
///
/// `get` distinguishes "absent" (`Ok(None)`) from "unreadable" (`Err`);
/// `remove` of an absent key succeeds.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

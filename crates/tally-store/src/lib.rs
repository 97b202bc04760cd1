//! # tally-store: Persistence Layer for Tally
//!
//! This crate gives the cart somewhere to put its snapshot between runs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Data Flow                                 │
//! │                                                                         │
//! │  CartStore (tally-core) commits a mutation                             │
//! │       │                                                                 │
//! │       │  SessionPersistence::save(&snapshot)                           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   tally-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────┐        ┌─────────────────────────────┐ │   │
//! │  │   │ PersistenceGateway│        │        KeyValueStore        │ │   │
//! │  │   │   (gateway.rs)    │───────►│  MemoryStore   FileStore    │ │   │
//! │  │   │  JSON encode /    │        │  (quota)       (atomic      │ │   │
//! │  │   │  tolerant decode  │        │                 rename)     │ │   │
//! │  │   └───────────────────┘        └─────────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data dir>/tally.cart.session                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`gateway`] - `SessionPersistence` implementation
//! - [`kv`] - Key-value store trait and backends
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use tally_core::{CartStore, RestoreOutcome};
//! use tally_store::{MemoryStore, PersistenceGateway};
//!
//! let (mut cart, outcome) = CartStore::restore(PersistenceGateway::new(MemoryStore::new()));
//! assert_eq!(outcome, RestoreOutcome::Fresh);
//!
//! let commit = cart.initialize("Ana", "25").unwrap();
//! assert!(commit.is_persisted());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod kv;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use gateway::{PersistenceGateway, DEFAULT_STORAGE_KEY};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally, a budget-constrained shopping cart.
//! It holds every business rule as plain Rust with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Input Surface (tally-terminal)                  │   │
//! │  │    Owner prompt ──► Budget prompt ──► Item loop ──► Summary     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw strings                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │validation │  │   cart    │  │ snapshot  │  │   │
//! │  │   │   Money   │  │  fields   │  │ CartStore │  │ Persisted │  │   │
//! │  │   │  parse    │  │  ranges   │  │  phases   │  │ Snapshot  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILE SYSTEM • NO TERMINAL • PURE LOGIC            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SessionPersistence                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  tally-store (Persistence Layer)                │   │
//! │  │           key-value stores, JSON snapshot gateway               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (cents, never floats)
//! - [`validation`] - Field rules for owner, budget, product name, price, quantity
//! - [`types`] - Line items, session, phases and read-only views
//! - [`cart`] - The [`CartStore`] state machine
//! - [`snapshot`] - Persisted record and the [`SessionPersistence`] seam
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{CartError, CartStore, Money, PersistedSnapshot, SessionPersistence};
//! use tally_core::error::PersistenceUnavailable;
//!
//! #[derive(Default)]
//! struct Nowhere;
//!
//! impl SessionPersistence for Nowhere {
//!     fn save(&mut self, _: &PersistedSnapshot) -> Result<(), PersistenceUnavailable> {
//!         Ok(())
//!     }
//!     fn load(&self) -> Option<PersistedSnapshot> {
//!         None
//!     }
//!     fn clear(&mut self) -> Result<(), PersistenceUnavailable> {
//!         Ok(())
//!     }
//! }
//!
//! let mut cart = CartStore::new(Nowhere);
//! cart.initialize("Ana", "10.00").unwrap().into_strict().unwrap();
//! cart.add_item("Pen", "2.50", "2").unwrap().into_strict().unwrap();
//!
//! assert_eq!(cart.remaining_budget(), Money::from_cents(500));
//! assert!(matches!(
//!     cart.add_item("Pen", "2.50", "3"),
//!     Err(CartError::BudgetExceeded { .. })
//! ));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod snapshot;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddedItem, CartStore, Commit, RestoreOutcome};
pub use error::{CartError, CartResult, PersistenceUnavailable, ValidationError, ValidationErrors};
pub use money::Money;
pub use snapshot::{PersistedSnapshot, SessionPersistence};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Owner name length bounds, in characters after trimming.
pub const OWNER_NAME_MIN_LEN: usize = 2;
pub const OWNER_NAME_MAX_LEN: usize = 50;

/// Product name length bounds, in characters after trimming.
pub const PRODUCT_NAME_MIN_LEN: usize = 2;
pub const PRODUCT_NAME_MAX_LEN: usize = 100;

/// Smallest accepted budget or unit price: $0.01.
pub const MIN_AMOUNT_CENTS: i64 = 1;

/// Largest accepted budget or unit price: $999,999,999.00.
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999_900;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Applies both to a single add and to the merged quantity of a line, so a
/// typo like `100000` never lands in the cart.
pub const MAX_ITEM_QUANTITY: u32 = 99_999;

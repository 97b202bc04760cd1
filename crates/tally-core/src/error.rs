//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ValidationError         - one field, one reason                   │
//! │  ├── ValidationErrors        - every failing field of one request      │
//! │  ├── PersistenceUnavailable  - snapshot write/clear failed             │
//! │  └── CartError               - everything a CartStore call can return  │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError              - key-value store failures                │
//! │                                                                         │
//! │  Flow: StoreError → PersistenceUnavailable → CartError → user message  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are values: nothing in this crate panics on bad input
//! 3. Validation failures are field-scoped so the input surface can flag
//!    exactly the fields that need re-entering

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::types::CartPhase;

// =============================================================================
// Field & Reason
// =============================================================================

/// The user-supplied input a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Owner,
    Budget,
    /// Product name.
    Name,
    Price,
    Quantity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Owner => write!(f, "owner name"),
            Field::Budget => write!(f, "budget"),
            Field::Name => write!(f, "product name"),
            Field::Price => write!(f, "price"),
            Field::Quantity => write!(f, "quantity"),
        }
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Reason {
    /// Blank after trimming.
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    /// Contains a character outside the field's alphabet.
    InvalidCharacters,
    /// Does not match `-?digits(.digits)?`.
    NotNumeric,
    /// Not a bare integer literal.
    NotInteger,
    /// Parsed, but outside the field's inclusive range.
    OutOfRange,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Empty => write!(f, "is required"),
            Reason::TooShort { min } => write!(f, "must be at least {} characters", min),
            Reason::TooLong { max } => write!(f, "must be at most {} characters", max),
            Reason::InvalidCharacters => write!(f, "contains invalid characters"),
            Reason::NotNumeric => write!(f, "must be a number"),
            Reason::NotInteger => write!(f, "must be a whole number"),
            Reason::OutOfRange => write!(f, "is out of range"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field-scoped rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: Reason,
}

impl ValidationError {
    pub const fn new(field: Field, reason: Reason) -> Self {
        ValidationError { field, reason }
    }
}

/// Every rejected field of one request, in input order.
///
/// Never empty: it is only built from at least one [`ValidationError`].
/// Displays as the individual messages joined by `"; "`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Collects failures; returns `None` when there are none.
    pub fn collect(errors: impl IntoIterator<Item = ValidationError>) -> Option<Self> {
        let errors: Vec<_> = errors.into_iter().collect();
        if errors.is_empty() {
            None
        } else {
            Some(ValidationErrors(errors))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The rejected fields, in input order.
    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|e| e.field).collect()
    }

    /// The reason recorded for `field`, if it was rejected.
    pub fn reason_for(&self, field: Field) -> Option<Reason> {
        self.0.iter().find(|e| e.field == field).map(|e| e.reason)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        ValidationErrors(vec![err])
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Persistence Error
// =============================================================================

/// The snapshot could not be written or cleared.
///
/// Never rolls back the in-memory mutation that triggered the write: the
/// cart in memory is authoritative, the snapshot is a cache of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Persistence unavailable: {reason}")]
pub struct PersistenceUnavailable {
    pub reason: String,
}

impl PersistenceUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        PersistenceUnavailable {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Everything a [`CartStore`](crate::cart::CartStore) operation can fail with.
///
/// ## User Workflow
/// ```text
/// add_item("Pen", "2.50", "3")
///      │
///      ├── a field fails its rules ─────► InvalidItem([...every bad field])
///      │
///      ├── total + 7.50 > budget ───────► BudgetExceeded { available: 5.00 }
///      │
///      └── OK ──► state mutated, snapshot written (best effort)
/// ```
#[derive(Debug, Error)]
pub enum CartError {
    /// One or more product fields were rejected. State unchanged.
    #[error("Invalid item: {0}")]
    InvalidItem(ValidationErrors),

    /// Owner and/or budget were rejected by `initialize`. State unchanged.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ValidationErrors),

    /// Committing the item would push the total past the budget.
    #[error("Budget exceeded: {requested} requested, {available} available")]
    BudgetExceeded { available: Money, requested: Money },

    /// A merge would push a line's quantity past the per-line maximum.
    #[error("Quantity {current} + {requested} exceeds maximum allowed ({max})")]
    QuantityLimitExceeded { current: u32, requested: u32, max: u32 },

    /// `finalize` on a cart without items.
    #[error("Cart is empty")]
    EmptyCart,

    /// `remove_item` with an index past the end.
    #[error("No item at index {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The operation is not legal in the current phase.
    #[error("Cannot {operation} while cart is {phase}")]
    IllegalStateTransition {
        operation: &'static str,
        phase: CartPhase,
    },

    /// The snapshot write failed (only produced by `Commit::into_strict`).
    #[error(transparent)]
    PersistenceUnavailable(#[from] PersistenceUnavailable),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

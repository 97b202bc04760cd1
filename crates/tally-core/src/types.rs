//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Session      │   │    LineItem     │   │   CartPhase     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  owner          │◄──│  name           │   │  Uninitialized  │       │
//! │  │  budget         │   │  price          │   │  Configured     │       │
//! │  │  items[]        │   │  quantity       │   │  Finalized      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   CartTotals    │   │  CartSummary    │  Read-only views for the    │
//! │  │  (live view)    │   │ (after finalize)│  presentation surface       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Line Identity
//! Two lines are the same product when their names match case-insensitively
//! and their unit prices are equal to the cent. Adding an existing identity
//! bumps that line's quantity and keeps the first-seen spelling of the name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cart Phase
// =============================================================================

/// Lifecycle phase of a cart.
///
/// ```text
/// Uninitialized ──initialize──► Configured ──finalize──► Finalized
///       ▲                        │  ▲   │                     │
///       │                        │  └───┘ add/remove          │
///       └────────── reset ───────┴────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CartPhase {
    /// No owner or budget yet.
    #[default]
    Uninitialized,
    /// Accepting items.
    Configured,
    /// Purchase closed; only `reset` is legal.
    Finalized,
}

impl fmt::Display for CartPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartPhase::Uninitialized => write!(f, "uninitialized"),
            CartPhase::Configured => write!(f, "configured"),
            CartPhase::Finalized => write!(f, "finalized"),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product line in the cart.
///
/// Serialized as `{ name, price, quantity }` with `price` as a decimal
/// number; this is both the presentation shape and the persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Display name as first entered (trimmed).
    pub name: String,

    /// Unit price, already rounded to cents.
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub price: Money,

    /// Units of this product, 1 to 99,999.
    pub quantity: u32,
}

impl LineItem {
    pub fn new(name: impl Into<String>, price: Money, quantity: u32) -> Self {
        LineItem {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// `price × quantity`.
    ///
    /// Saturates instead of overflowing; validated lines are bounded far
    /// below `i64::MAX` cents.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price.cents().saturating_mul(i64::from(self.quantity)))
    }

    /// Whether this line has the identity `(name, price)`.
    pub fn same_product(&self, name: &str, price: Money) -> bool {
        self.price == price && self.name.to_lowercase() == name.to_lowercase()
    }
}

// =============================================================================
// Session
// =============================================================================

/// The authoritative state of a configured cart.
///
/// ## Invariants
/// - `items` total never exceeds `budget`
/// - no two items share an identity (see [`LineItem::same_product`])
///
/// Only [`CartStore`](crate::cart::CartStore) builds or mutates sessions, so
/// the fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) owner: String,
    pub(crate) budget: Money,
    pub(crate) items: Vec<LineItem>,
}

impl Session {
    pub(crate) fn new(owner: String, budget: Money) -> Self {
        Session {
            owner,
            budget,
            items: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn budget(&self) -> Money {
        self.budget
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of every line total.
    pub fn total(&self) -> Money {
        total_of(&self.items)
    }

    /// `budget - total`; never negative while the invariant holds.
    pub fn remaining(&self) -> Money {
        self.budget - self.total()
    }

    pub(crate) fn position_of(&self, name: &str, price: Money) -> Option<usize> {
        self.items.iter().position(|i| i.same_product(name, price))
    }
}

pub(crate) fn total_of(items: &[LineItem]) -> Money {
    items
        .iter()
        .fold(Money::zero(), |acc, item| acc.saturating_add(item.line_total()))
}

// =============================================================================
// Views
// =============================================================================

/// Live figures for rendering the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub phase: CartPhase,
    /// Distinct lines.
    pub item_count: usize,
    /// Units across all lines.
    pub total_quantity: u64,
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub budget: Money,
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub total: Money,
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub remaining: Money,
}

/// Immutable purchase summary produced by `finalize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub owner: String,
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub budget: Money,
    pub items: Vec<LineItem>,
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub total: Money,
    #[serde(with = "crate::money::as_decimal")]
    #[ts(type = "number")]
    pub remaining: Money,
    #[ts(as = "String")]
    pub finalized_at: DateTime<Utc>,
}

impl CartSummary {
    pub(crate) fn from_session(session: &Session, finalized_at: DateTime<Utc>) -> Self {
        CartSummary {
            owner: session.owner.clone(),
            budget: session.budget,
            items: session.items.clone(),
            total: session.total(),
            remaining: session.remaining(),
            finalized_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

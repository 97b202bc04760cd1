//! # Persisted Snapshot
//!
//! The durable projection of a [`Session`] and the seam through which the
//! cart reaches storage.
//!
//! ## Layout
//! ```json
//! {
//!   "items": [{ "name": "Pen", "price": 2.5, "quantity": 2 }],
//!   "owner": "Ana",
//!   "budget": 10.0,
//!   "savedAt": "2026-10-16T09:30:00Z"
//! }
//! ```
//!
//! One record, one fixed key. The cart is the single writer; whatever
//! implements [`SessionPersistence`] is a pass-through codec with no state of
//! its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceUnavailable;
use crate::money::Money;
use crate::types::{total_of, LineItem, Session};
use crate::validation::{is_amount_in_range, validate_owner_name};
use crate::MAX_ITEM_QUANTITY;

/// A session frozen at the moment of its last committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub items: Vec<LineItem>,
    pub owner: String,
    #[serde(with = "crate::money::as_decimal")]
    pub budget: Money,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSnapshot {
    /// Captures `session` as of `saved_at`.
    pub fn capture(session: &Session, saved_at: DateTime<Utc>) -> Self {
        PersistedSnapshot {
            items: session.items.clone(),
            owner: session.owner.clone(),
            budget: session.budget,
            saved_at,
        }
    }

    /// Sum of the stored line totals.
    pub fn items_total(&self) -> Money {
        total_of(&self.items)
    }

    /// Whether the snapshot can be restored straight into a configured cart.
    ///
    /// ## Rules
    /// - at least one item
    /// - owner passes the owner-name rules, budget is within range
    /// - every line has an in-range price and quantity
    /// - no two lines share an identity
    /// - the items total does not exceed the budget
    ///
    /// Item names are not re-validated: they were accepted when added.
    pub fn is_resumable(&self) -> bool {
        if self.items.is_empty()
            || validate_owner_name(&self.owner).is_err()
            || !is_amount_in_range(self.budget)
        {
            return false;
        }

        let lines_ok = self.items.iter().enumerate().all(|(i, item)| {
            is_amount_in_range(item.price)
                && (1..=MAX_ITEM_QUANTITY).contains(&item.quantity)
                && !self.items[..i]
                    .iter()
                    .any(|earlier| earlier.same_product(&item.name, item.price))
        });

        lines_ok && self.items_total() <= self.budget
    }

    /// Rebuilds the session. Callers check [`is_resumable`](Self::is_resumable) first.
    pub(crate) fn into_session(self) -> Session {
        Session {
            owner: self.owner,
            budget: self.budget,
            items: self.items,
        }
    }
}

/// Storage seam for cart snapshots.
///
/// ## Contract
/// - `save` overwrites any previous snapshot under the implementation's key
/// - `load` returns `None` for an absent, unreadable or undecodable snapshot;
///   corrupt data is never fatal
/// - `clear` is idempotent
///
/// Failures never roll back the cart: in-memory state is authoritative.
pub trait SessionPersistence {
    fn save(&mut self, snapshot: &PersistedSnapshot) -> Result<(), PersistenceUnavailable>;

    fn load(&self) -> Option<PersistedSnapshot>;

    fn clear(&mut self) -> Result<(), PersistenceUnavailable>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(items: Vec<LineItem>, owner: &str, budget_cents: i64) -> PersistedSnapshot {
        PersistedSnapshot {
            items,
            owner: owner.to_string(),
            budget: Money::from_cents(budget_cents),
            saved_at: Utc::now(),
        }
    }

    fn pen(quantity: u32) -> LineItem {
        LineItem::new("Pen", Money::from_cents(250), quantity)
    }

    #[test]
    fn test_json_layout() {
        let snap = PersistedSnapshot {
            items: vec![pen(2)],
            owner: "Ana".to_string(),
            budget: Money::from_cents(1000),
            saved_at: "2026-10-16T09:30:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [{ "name": "Pen", "price": 2.5, "quantity": 2 }],
                "owner": "Ana",
                "budget": 10.0,
                "savedAt": "2026-10-16T09:30:00Z"
            })
        );

        let back: PersistedSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_resumable_snapshot() {
        assert!(snapshot(vec![pen(2)], "Ana", 1000).is_resumable());
    }

    #[test]
    fn test_not_resumable() {
        // No items
        assert!(!snapshot(vec![], "Ana", 1000).is_resumable());
        // Bad owner
        assert!(!snapshot(vec![pen(2)], "A", 1000).is_resumable());
        assert!(!snapshot(vec![pen(2)], "R2D2", 1000).is_resumable());
        // Budget out of range
        assert!(!snapshot(vec![pen(2)], "Ana", 0).is_resumable());
        // Over budget
        assert!(!snapshot(vec![pen(5)], "Ana", 1000).is_resumable());
        // Quantity out of range
        assert!(!snapshot(vec![pen(0)], "Ana", 1000).is_resumable());
        // Duplicate identity
        let dupes = vec![pen(1), LineItem::new("PEN", Money::from_cents(250), 1)];
        assert!(!snapshot(dupes, "Ana", 1000).is_resumable());
    }
}

//! # Cart Store
//!
//! The budget-constrained cart state machine.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Input Surface            CartStore                 State Change        │
//! │  ─────────────            ─────────                 ────────────        │
//! │                                                                         │
//! │  Owner + budget ─────────► initialize() ──────────► Configured          │
//! │                                                                         │
//! │  Name/price/qty ─────────► add_item() ────────────► push or merge line  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item(i) ────────► items.remove(i)     │
//! │                                                                         │
//! │  Checkout ───────────────► finalize() ────────────► Finalized(summary)  │
//! │                                                                         │
//! │  Start over ─────────────► reset() ───────────────► Uninitialized       │
//! │                                                                         │
//! │  Render ─────────────────► totals() / items() ────► (read only)         │
//! │                                                                         │
//! │  Every committed mutation writes a snapshot through SessionPersistence. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! None. One logical actor drives the store through `&mut self`; every call
//! runs to completion before the next one starts.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{CartError, CartResult, PersistenceUnavailable};
use crate::money::Money;
use crate::snapshot::{PersistedSnapshot, SessionPersistence};
use crate::types::{CartPhase, CartSummary, CartTotals, LineItem, Session};
use crate::validation::{validate_configuration, validate_item};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Outcomes
// =============================================================================

/// A committed mutation plus the result of snapshotting it.
///
/// The mutation stands whatever `persistence` says.
#[derive(Debug)]
#[must_use]
pub struct Commit<T> {
    pub value: T,
    pub persistence: Result<(), PersistenceUnavailable>,
}

impl<T> Commit<T> {
    pub fn is_persisted(&self) -> bool {
        self.persistence.is_ok()
    }

    /// Drops the persistence result.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Folds a persistence failure into [`CartError::PersistenceUnavailable`].
    ///
    /// The in-memory mutation has still happened when this returns `Err`.
    pub fn into_strict(self) -> CartResult<T> {
        self.persistence?;
        Ok(self.value)
    }
}

/// What `add_item` committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedItem {
    /// The line as it now stands (after any merge).
    pub item: LineItem,
    /// Position of the line in the cart.
    pub index: usize,
    /// True when an existing line absorbed the quantity.
    pub merged: bool,
    /// Budget left after the commit.
    pub remaining: Money,
}

/// How [`CartStore::restore`] found the stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing usable was stored.
    Fresh,
    /// The cart resumed in `Configured` with the stored items.
    Resumed { item_count: usize },
    /// A snapshot existed but could not be resumed; its owner and budget are
    /// handed back to pre-fill the input surface. The cart stays
    /// `Uninitialized`.
    Prefill { owner: String, budget: Money },
}

// =============================================================================
// Cart Store
// =============================================================================

#[derive(Debug, Clone)]
enum SessionState {
    Uninitialized,
    Configured(Session),
    Finalized(CartSummary),
}

/// Owns the authoritative cart session.
///
/// ## Invariants
/// - the items total never exceeds the budget, not even transiently: every
///   check happens before the first write
/// - no two lines share an identity (case-insensitive name, exact price)
/// - a rejected call leaves the state exactly as it was
#[derive(Debug)]
pub struct CartStore<P> {
    state: SessionState,
    persistence: P,
}

impl<P: SessionPersistence> CartStore<P> {
    /// Creates an `Uninitialized` store. Storage is not touched.
    pub fn new(persistence: P) -> Self {
        CartStore {
            state: SessionState::Uninitialized,
            persistence,
        }
    }

    /// Creates a store from whatever snapshot `persistence` holds.
    ///
    /// ## Behavior
    /// ```text
    /// load()
    ///   │
    ///   ├── None ────────────────────────► Fresh        (Uninitialized)
    ///   │
    ///   ├── resumable snapshot ──────────► Resumed      (Configured, items restored)
    ///   │
    ///   └── anything else ───────────────► Prefill      (Uninitialized, owner/budget
    ///                                                    offered as form defaults)
    /// ```
    /// A resumable snapshot is trusted as previously validated; see
    /// [`PersistedSnapshot::is_resumable`] for the structural checks applied.
    pub fn restore(persistence: P) -> (Self, RestoreOutcome) {
        let mut store = CartStore::new(persistence);

        let Some(snapshot) = store.persistence.load() else {
            debug!("No stored cart snapshot");
            return (store, RestoreOutcome::Fresh);
        };

        if snapshot.is_resumable() {
            let item_count = snapshot.items.len();
            info!(
                owner = %snapshot.owner,
                item_count,
                saved_at = %snapshot.saved_at,
                "Resuming stored cart"
            );
            store.state = SessionState::Configured(snapshot.into_session());
            (store, RestoreOutcome::Resumed { item_count })
        } else {
            debug!(owner = %snapshot.owner, "Stored cart not resumable, pre-filling form");
            let outcome = RestoreOutcome::Prefill {
                owner: snapshot.owner,
                budget: snapshot.budget,
            };
            (store, outcome)
        }
    }

    // -------------------------------------------------------------------------
    // Read-only views
    // -------------------------------------------------------------------------

    pub fn phase(&self) -> CartPhase {
        match self.state {
            SessionState::Uninitialized => CartPhase::Uninitialized,
            SessionState::Configured(_) => CartPhase::Configured,
            SessionState::Finalized(_) => CartPhase::Finalized,
        }
    }

    /// The live session while `Configured`.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Configured(session) => Some(session),
            _ => None,
        }
    }

    /// The purchase summary while `Finalized`.
    pub fn summary(&self) -> Option<&CartSummary> {
        match &self.state {
            SessionState::Finalized(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        match &self.state {
            SessionState::Uninitialized => None,
            SessionState::Configured(session) => Some(&session.owner),
            SessionState::Finalized(summary) => Some(&summary.owner),
        }
    }

    /// Zero while `Uninitialized`.
    pub fn budget(&self) -> Money {
        match &self.state {
            SessionState::Uninitialized => Money::zero(),
            SessionState::Configured(session) => session.budget,
            SessionState::Finalized(summary) => summary.budget,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        match &self.state {
            SessionState::Uninitialized => &[],
            SessionState::Configured(session) => &session.items,
            SessionState::Finalized(summary) => &summary.items,
        }
    }

    /// Sum of `price × quantity` over every line. Callable in any phase.
    pub fn current_total(&self) -> Money {
        match &self.state {
            SessionState::Uninitialized => Money::zero(),
            SessionState::Configured(session) => session.total(),
            SessionState::Finalized(summary) => summary.total,
        }
    }

    /// `budget - current_total()`; never negative.
    pub fn remaining_budget(&self) -> Money {
        self.budget() - self.current_total()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Sets the owner and budget: `Uninitialized → Configured`.
    ///
    /// Both fields are validated together; on failure every bad field is
    /// reported and the store stays `Uninitialized`.
    pub fn initialize(&mut self, owner_raw: &str, budget_raw: &str) -> CartResult<Commit<()>> {
        self.require(CartPhase::Uninitialized, "initialize")?;

        let (owner, budget) =
            validate_configuration(owner_raw, budget_raw).map_err(CartError::InvalidConfiguration)?;

        info!(owner = %owner, budget = %budget, "Cart initialized");
        self.state = SessionState::Configured(Session::new(owner, budget));

        Ok(self.commit(()))
    }

    /// Adds a product, merging into an existing line with the same identity.
    ///
    /// ## User Workflow
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  add_item("Pen", "2.50", "3")                                           │
    /// │                    │                                                    │
    /// │                    ▼                                                    │
    /// │  1. Phase must be Configured       else IllegalStateTransition          │
    /// │  2. Validate name, price, qty      else InvalidItem([every bad field])  │
    /// │  3. cost = price × qty  (same for new lines and merges)                 │
    /// │  4. total + cost > budget?         → BudgetExceeded { available }       │
    /// │  5. merge target qty + qty > max?  → QuantityLimitExceeded              │
    /// │  6. merge or push, then snapshot                                        │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    /// Steps 1-5 never write, so a rejected call leaves the cart untouched.
    pub fn add_item(
        &mut self,
        name_raw: &str,
        price_raw: &str,
        quantity_raw: &str,
    ) -> CartResult<Commit<AddedItem>> {
        let phase = self.phase();
        let SessionState::Configured(session) = &mut self.state else {
            return Err(CartError::IllegalStateTransition {
                operation: "add an item",
                phase,
            });
        };

        let candidate =
            validate_item(name_raw, price_raw, quantity_raw).map_err(CartError::InvalidItem)?;

        let total = session.total();
        let available = session.budget - total;
        let cost = candidate.price.multiply_quantity(candidate.quantity);
        let projected = cost.and_then(|c| total.checked_add(c));

        match (cost, projected) {
            (Some(_), Some(projected)) if projected <= session.budget => {}
            _ => {
                let requested = cost.unwrap_or(Money::from_cents(i64::MAX));
                debug!(
                    name = %candidate.name,
                    requested = %requested,
                    available = %available,
                    "Item rejected: budget exceeded"
                );
                return Err(CartError::BudgetExceeded {
                    available,
                    requested,
                });
            }
        }

        let (index, merged) = match session.position_of(&candidate.name, candidate.price) {
            Some(index) => {
                let line = &mut session.items[index];
                let quantity = line
                    .quantity
                    .checked_add(candidate.quantity)
                    .filter(|q| *q <= MAX_ITEM_QUANTITY)
                    .ok_or(CartError::QuantityLimitExceeded {
                        current: line.quantity,
                        requested: candidate.quantity,
                        max: MAX_ITEM_QUANTITY,
                    })?;
                line.quantity = quantity;
                (index, true)
            }
            None => {
                session.items.push(LineItem::new(
                    candidate.name,
                    candidate.price,
                    candidate.quantity,
                ));
                (session.items.len() - 1, false)
            }
        };

        let added = AddedItem {
            item: session.items[index].clone(),
            index,
            merged,
            remaining: session.remaining(),
        };

        debug!(
            name = %added.item.name,
            quantity = added.item.quantity,
            merged,
            remaining = %added.remaining,
            "Item committed"
        );

        Ok(self.commit(added))
    }

    /// Removes the line at `index` and returns it.
    ///
    /// Order of the remaining lines is preserved. An index past the end is
    /// reported as [`CartError::IndexOutOfRange`] and changes nothing.
    pub fn remove_item(&mut self, index: usize) -> CartResult<Commit<LineItem>> {
        let phase = self.phase();
        let SessionState::Configured(session) = &mut self.state else {
            return Err(CartError::IllegalStateTransition {
                operation: "remove an item",
                phase,
            });
        };

        if index >= session.items.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: session.items.len(),
            });
        }

        let removed = session.items.remove(index);
        debug!(index, name = %removed.name, "Item removed");

        Ok(self.commit(removed))
    }

    /// Closes the purchase: `Configured → Finalized`.
    ///
    /// Requires at least one item. The returned summary is the same value
    /// later available through [`summary`](Self::summary). No snapshot is
    /// written; the stored cart stays until [`reset`](Self::reset).
    pub fn finalize(&mut self) -> CartResult<CartSummary> {
        let phase = self.phase();
        let SessionState::Configured(session) = &self.state else {
            return Err(CartError::IllegalStateTransition {
                operation: "finalize",
                phase,
            });
        };

        if session.items.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let summary = CartSummary::from_session(session, Utc::now());
        info!(
            owner = %summary.owner,
            total = %summary.total,
            remaining = %summary.remaining,
            "Cart finalized"
        );

        self.state = SessionState::Finalized(summary.clone());
        Ok(summary)
    }

    /// Clears everything and deletes the stored snapshot. Legal in any phase.
    pub fn reset(&mut self) -> Commit<()> {
        debug!(from = %self.phase(), "Cart reset");
        self.state = SessionState::Uninitialized;

        let persistence = self.persistence.clear();
        if let Err(err) = &persistence {
            warn!(error = %err, "Failed to clear stored cart");
        }

        Commit {
            value: (),
            persistence,
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn require(&self, expected: CartPhase, operation: &'static str) -> CartResult<()> {
        let phase = self.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(CartError::IllegalStateTransition { operation, phase })
        }
    }

    /// Snapshots the live session (if any) and wraps `value`.
    fn commit<T>(&mut self, value: T) -> Commit<T> {
        let persistence = match &self.state {
            SessionState::Configured(session) => {
                let snapshot = PersistedSnapshot::capture(session, Utc::now());
                self.persistence.save(&snapshot)
            }
            _ => Ok(()),
        };

        if let Err(err) = &persistence {
            warn!(error = %err, "Cart snapshot not saved; continuing in memory");
        }

        Commit { value, persistence }
    }
}

impl<P: SessionPersistence> From<&CartStore<P>> for CartTotals {
    fn from(store: &CartStore<P>) -> Self {
        let items = store.items();
        CartTotals {
            phase: store.phase(),
            item_count: items.len(),
            total_quantity: items.iter().map(|i| u64::from(i.quantity)).sum(),
            budget: store.budget(),
            total: store.current_total(),
            remaining: store.remaining_budget(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

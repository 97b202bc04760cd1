//! # Persistence Gateway
//!
//! Encodes cart snapshots as JSON under one fixed key of a
//! [`KeyValueStore`], implementing the core's [`SessionPersistence`] seam.
//!
//! ## Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation   Store result              Gateway result                   │
//! │  ─────────   ────────────              ──────────────                   │
//! │  save        Ok                        Ok                               │
//! │  save        QuotaExceeded / Io        Err(PersistenceUnavailable)      │
//! │  load        value, decodes            Some(snapshot)                   │
//! │  load        absent                    None                             │
//! │  load        Io / corrupt JSON         None (logged, never fatal)       │
//! │  clear       Ok / absent               Ok                               │
//! │  clear       Io                        Err(PersistenceUnavailable)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{PersistedSnapshot, PersistenceUnavailable, SessionPersistence};
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// Key the snapshot lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "tally.cart.session";

/// [`SessionPersistence`] over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct PersistenceGateway<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Gateway writing under [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        PersistenceGateway {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn write(&mut self, snapshot: &PersistedSnapshot) -> StoreResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.store.set(&self.key, &json)
    }

    fn read(&self) -> StoreResult<Option<PersistedSnapshot>> {
        match self.store.get(&self.key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

impl<S: KeyValueStore> SessionPersistence for PersistenceGateway<S> {
    fn save(&mut self, snapshot: &PersistedSnapshot) -> Result<(), PersistenceUnavailable> {
        self.write(snapshot)?;
        debug!(key = %self.key, items = snapshot.items.len(), "Snapshot saved");
        Ok(())
    }

    fn load(&self) -> Option<PersistedSnapshot> {
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(key = %self.key, error = %err, "Discarding unreadable snapshot");
                None
            }
        }
    }

    fn clear(&mut self) -> Result<(), PersistenceUnavailable> {
        self.store.remove(&self.key)?;
        debug!(key = %self.key, "Snapshot cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use chrono::{TimeZone, Utc};
    use tally_core::{CartError, CartPhase, CartStore, LineItem, Money, RestoreOutcome};
    use tempfile::TempDir;

    fn snapshot() -> PersistedSnapshot {
        PersistedSnapshot {
            items: vec![LineItem::new("Pen", Money::from_cents(250), 2)],
            owner: "Ana".to_string(),
            budget: Money::from_cents(1000),
            saved_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_save_load_clear() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        assert_eq!(gateway.load(), None);

        gateway.save(&snapshot()).unwrap();
        assert_eq!(gateway.load(), Some(snapshot()));

        let raw = gateway.store().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"savedAt\":\"2026-10-16T09:30:00Z\""));
        assert!(raw.contains("\"price\":2.5"));

        gateway.clear().unwrap();
        gateway.clear().unwrap();
        assert_eq!(gateway.load(), None);
    }

    #[test]
    fn test_corrupt_data_loads_as_none() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let gateway = PersistenceGateway::new(store);
        assert_eq!(gateway.load(), None);

        let mut store = MemoryStore::new();
        store
            .set(DEFAULT_STORAGE_KEY, r#"{"items":[],"owner":"Ana"}"#)
            .unwrap();
        assert_eq!(PersistenceGateway::new(store).load(), None);
    }

    #[test]
    fn test_custom_key() {
        let mut gateway = PersistenceGateway::with_key(MemoryStore::new(), "other");
        gateway.save(&snapshot()).unwrap();

        assert_eq!(gateway.key(), "other");
        assert!(gateway.store().get("other").unwrap().is_some());
        assert!(gateway.store().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_quota_failure_is_reported_not_rolled_back() {
        let gateway = PersistenceGateway::new(MemoryStore::with_quota(16));
        let mut cart = CartStore::new(gateway);

        let commit = cart.initialize("Ana", "10.00").unwrap();
        assert!(!commit.is_persisted());
        assert_eq!(cart.phase(), CartPhase::Configured);

        let err = cart
            .add_item("Pen", "2.50", "2")
            .unwrap()
            .into_strict()
            .unwrap_err();
        assert!(matches!(err, CartError::PersistenceUnavailable(_)));
        assert_eq!(cart.current_total(), Money::from_cents(500));
    }

    #[test]
    fn test_cart_survives_restart_on_disk() {
        let tmp = TempDir::new().unwrap();

        {
            let mut cart = CartStore::new(PersistenceGateway::new(FileStore::new(tmp.path())));
            cart.initialize("Ana", "10.00").unwrap().into_strict().unwrap();
            cart.add_item("Pen", "2.50", "2").unwrap().into_strict().unwrap();
            cart.add_item("Book", "4", "1").unwrap().into_strict().unwrap();
        }

        let (mut cart, outcome) =
            CartStore::restore(PersistenceGateway::new(FileStore::new(tmp.path())));
        assert_eq!(outcome, RestoreOutcome::Resumed { item_count: 2 });
        assert_eq!(cart.owner(), Some("Ana"));
        assert_eq!(cart.remaining_budget(), Money::from_cents(100));

        cart.reset().into_strict().unwrap();
        assert!(!tmp.path().join(DEFAULT_STORAGE_KEY).exists());

        let (_, outcome) = CartStore::restore(PersistenceGateway::new(FileStore::new(tmp.path())));
        assert_eq!(outcome, RestoreOutcome::Fresh);
    }

    #[test]
    fn test_over_budget_snapshot_prefills() {
        let mut tampered = snapshot();
        tampered.items[0].quantity = 50;

        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        gateway.save(&tampered).unwrap();

        let (cart, outcome) = CartStore::restore(gateway);
        assert_eq!(
            outcome,
            RestoreOutcome::Prefill {
                owner: "Ana".to_string(),
                budget: Money::from_cents(1000),
            }
        );
        assert_eq!(cart.phase(), CartPhase::Uninitialized);
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::EngineConfig;
use crate::records::fixture;
use crate::records::snapshot::{RecordSet, Snapshot};
use crate::{ClientError, ClientResult};

/// Owner of the current record snapshot.
///
/// Readers clone the `Arc` and keep it for the whole request; writers build
/// and validate the replacement first and only take the write lock for the
/// pointer swap, so no reader ever sees a half-built store.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
    next_generation: AtomicU64,
}

impl SnapshotStore {
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::empty(0))),
            next_generation: AtomicU64::new(1),
        }
    }

    pub fn with_records(records: RecordSet) -> ClientResult<Self> {
        let store = Self::empty();
        store.replace(records)?;
        Ok(store)
    }

    pub fn from_fixture(config: &EngineConfig, now: DateTime<Utc>) -> ClientResult<Self> {
        Self::with_records(fixture::generate(config, now))
    }

    pub fn current(&self) -> ClientResult<Arc<Snapshot>> {
        self.current
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| ClientError::store_unavailable("snapshot lock is poisoned"))
    }

    /// Validates `records` and swaps them in as a new generation.
    pub fn replace(&self, records: RecordSet) -> ClientResult<u64> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let snapshot = Arc::new(Snapshot::build(generation, records)?);
        let transaction_count = snapshot.transactions().len();

        let mut guard = self
            .current
            .write()
            .map_err(|_| ClientError::store_unavailable("snapshot lock is poisoned"))?;
        *guard = snapshot;
        drop(guard);

        debug!(generation, transaction_count, "swapped record snapshot");
        Ok(generation)
    }
}

/// Process-wide store, seeded from the fixture generator on first use.
pub fn shared() -> ClientResult<&'static SnapshotStore> {
    static SHARED: OnceLock<SnapshotStore> = OnceLock::new();
    if let Some(store) = SHARED.get() {
        return Ok(store);
    }

    let config = EngineConfig::from_env()?;
    let store = SnapshotStore::from_fixture(&config, system_now())?;
    Ok(SHARED.get_or_init(|| store))
}

pub fn system_now() -> DateTime<Utc> {
    DateTime::<Utc>::from(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::SnapshotStore;
    use crate::records::snapshot::RecordSet;
    use crate::records::types::Transaction;

    fn record_set(ids: &[&str]) -> RecordSet {
        let timestamp = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default();
        RecordSet {
            transactions: ids
                .iter()
                .map(|id| Transaction {
                    id: (*id).to_string(),
                    timestamp,
                    amount: Decimal::new(-100, 2),
                    category: "coffee".to_string(),
                    merchant: "Blue Bottle".to_string(),
                    account_id: "acct_card".to_string(),
                })
                .collect(),
            ..RecordSet::default()
        }
    }

    #[test]
    fn replace_bumps_generation_and_keeps_old_readers_intact() {
        let store = SnapshotStore::with_records(record_set(&["a"]));
        assert!(store.is_ok());
        if let Ok(store) = store {
            let before = store.current();
            assert!(before.is_ok());
            let replaced = store.replace(record_set(&["b", "c"]));
            assert_eq!(replaced.ok(), Some(2));

            if let Ok(old) = before {
                assert_eq!(old.generation(), 1);
                assert_eq!(old.transactions().len(), 1);
            }
            let after = store.current();
            assert!(after.is_ok());
            if let Ok(new) = after {
                assert_eq!(new.generation(), 2);
                assert_eq!(new.transactions().len(), 2);
            }
        }
    }

    #[test]
    fn corrupt_replacement_leaves_current_snapshot_in_place() {
        let store = SnapshotStore::with_records(record_set(&["a"]));
        assert!(store.is_ok());
        if let Ok(store) = store {
            let replaced = store.replace(record_set(&["dup", "dup"]));
            assert!(replaced.is_err());
            let current = store.current();
            assert!(current.is_ok());
            if let Ok(snapshot) = current {
                assert_eq!(snapshot.transactions()[0].id, "a");
            }
        }
    }

    #[test]
    fn concurrent_readers_see_whole_generations() {
        let store = SnapshotStore::with_records(record_set(&["a"]));
        assert!(store.is_ok());
        if let Ok(store) = store {
            let store = Arc::new(store);
            let readers = (0..4)
                .map(|_| {
                    let shared = Arc::clone(&store);
                    std::thread::spawn(move || {
                        for _ in 0..50 {
                            if let Ok(snapshot) = shared.current() {
                                let expected = if snapshot.generation() == 1 { 1 } else { 2 };
                                assert_eq!(snapshot.transactions().len(), expected);
                            }
                        }
                    })
                })
                .collect::<Vec<_>>();
            for _ in 0..10 {
                let _ = store.replace(record_set(&["x", "y"]));
            }
            for reader in readers {
                assert!(reader.join().is_ok());
            }
        }
    }
}

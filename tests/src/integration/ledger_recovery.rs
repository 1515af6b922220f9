//! # Ledger Recovery Integration
//!
//! Storage faults the purchase ledger absorbs on its own: quota exhaustion,
//! corrupted blobs, legacy data and a second writer on the same storage.

#[cfg(test)]
mod tests {
    use crate::fixtures::record;
    use gp_02_purchase_ledger::{
        FileBackedKVStore, InMemoryKVStore, KeyValueStore, LedgerError, MigrationOutcome,
        PurchaseLedger, PurchaseLedgerApi, PurchaseStatus, HISTORY_KEY, UNKNOWN_WALLET,
        VERSION_KEY,
    };
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, PipelineEvent};
    use std::sync::Arc;

    fn ledger_over(store: Arc<InMemoryKVStore>) -> PurchaseLedger<InMemoryKVStore> {
        PurchaseLedger::new(store, Arc::new(InMemoryEventBus::new()))
    }

    // =============================================================================
    // QUOTA
    // =============================================================================

    #[test]
    fn test_quota_eviction_keeps_newest_half() {
        let store = Arc::new(InMemoryKVStore::new());
        let ledger = ledger_over(store.clone());
        for n in 1..=100 {
            ledger.append(record(n)).unwrap();
        }

        // The full history of 100 is exactly at the limit; 101 no longer fits
        let full = store.get(HISTORY_KEY).unwrap().unwrap().len();
        store.set_quota(Some(full));
        let mut events = ledger.subscribe();

        let history = ledger.append(record(101)).unwrap();

        assert_eq!(history.len(), 51);
        assert_eq!(history[0].signature, "sig-0101");
        assert_eq!(history[1].signature, "sig-0100");
        assert_eq!(history[50].signature, "sig-0051");
        assert_eq!(ledger.read_all().unwrap(), history);

        let mut pruned = None;
        while let Ok(Some(event)) = events.try_recv() {
            if let PipelineEvent::LedgerPruned { removed, retained } = event {
                pruned = Some((removed, retained));
            }
        }
        assert_eq!(pruned, Some((50, 50)));
    }

    #[test]
    fn test_failed_recovery_hands_record_back() {
        let store = Arc::new(InMemoryKVStore::new());
        let ledger = ledger_over(store.clone());
        ledger.append(record(1)).unwrap();
        ledger.append(record(2)).unwrap();

        store.set_quota(Some(8));
        let err = ledger.append(record(3)).unwrap_err();

        let LedgerError::WriteFailed { record: lost, .. } = err else {
            panic!("expected WriteFailed, got {err:?}");
        };
        assert_eq!(lost.signature, "sig-0003");

        store.set_quota(None);
        assert_eq!(ledger.read_all().unwrap().len(), 2);
    }

    // =============================================================================
    // CORRUPTION AND LEGACY DATA
    // =============================================================================

    #[test]
    fn test_corrupted_blob_reads_as_empty() {
        let store = Arc::new(InMemoryKVStore::new());
        let ledger = ledger_over(store.clone());
        ledger.migrate().unwrap();
        store.set(HISTORY_KEY, "[{\"id\": \"trunc").unwrap();
        let mut events = ledger.subscribe();

        assert!(ledger.read_all().unwrap().is_empty());
        assert!(!store.contains_key(HISTORY_KEY));
        assert!(matches!(
            events.try_recv().unwrap(),
            Some(PipelineEvent::LedgerReset { .. })
        ));

        // The ledger keeps working afterwards
        ledger.append(record(1)).unwrap();
        assert_eq!(ledger.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let store = Arc::new(InMemoryKVStore::new());
        let ledger = ledger_over(store.clone());
        ledger.migrate().unwrap();

        let mut bad = serde_json::to_value(record(2)).unwrap();
        bad["status"] = "refunded".into();
        let mut negative = serde_json::to_value(record(3)).unwrap();
        negative["price"] = (-1.0).into();
        let blob = serde_json::json!([serde_json::to_value(record(1)).unwrap(), bad, negative]);
        store.set(HISTORY_KEY, &blob.to_string()).unwrap();

        let history = ledger.read_all().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].signature, "sig-0001");
    }

    #[test]
    fn test_legacy_history_is_migrated_once() {
        let store = Arc::new(InMemoryKVStore::new());
        let mut legacy = serde_json::to_value(record(1)).unwrap();
        let legacy_obj = legacy.as_object_mut().unwrap();
        legacy_obj.remove("walletAddress");
        legacy_obj.remove("status");
        store
            .set(HISTORY_KEY, &serde_json::json!([legacy]).to_string())
            .unwrap();
        let ledger = ledger_over(store.clone());

        assert!(matches!(
            ledger.migrate().unwrap(),
            MigrationOutcome::Migrated { .. }
        ));
        assert_eq!(store.get(VERSION_KEY).unwrap().as_deref(), Some("1"));
        let after_first = store.get(HISTORY_KEY).unwrap();

        assert_eq!(ledger.migrate().unwrap(), MigrationOutcome::UpToDate);
        assert_eq!(store.get(HISTORY_KEY).unwrap(), after_first);

        let history = ledger.read_all().unwrap();
        assert_eq!(history[0].wallet_address, UNKNOWN_WALLET);
        assert_eq!(history[0].status, PurchaseStatus::Confirmed);
    }

    // =============================================================================
    // SHARED STORAGE
    // =============================================================================

    #[test]
    fn test_second_writer_triggers_reread() {
        let store = Arc::new(InMemoryKVStore::new());
        let tab_a = ledger_over(store.clone());
        let tab_b = ledger_over(store.clone());
        let mut tab_b_view = tab_b.subscribe();

        tab_a.append(record(1)).unwrap();
        // Tab B's bus never saw tab A's write
        assert!(!tab_b_view.drain_invalidations().unwrap());

        assert!(tab_b.notify_external_change(HISTORY_KEY));
        assert!(!tab_b.notify_external_change("theme"));
        assert!(tab_b_view.drain_invalidations().unwrap());
        assert_eq!(tab_b.read_all().unwrap()[0].signature, "sig-0001");

        // Both writers dedup against the shared blob
        tab_b.append(record(1)).unwrap();
        assert_eq!(tab_a.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_file_ledger_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glow").join("ledger.json");

        {
            let ledger = PurchaseLedger::with_store(Arc::new(FileBackedKVStore::new(&path)));
            ledger.append(record(1)).unwrap();
            ledger.append(record(2)).unwrap();
        }

        let bus = Arc::new(InMemoryEventBus::new());
        let mut events = bus.subscribe(EventFilter::topics(vec![EventTopic::Ledger]));
        let reopened = PurchaseLedger::new(Arc::new(FileBackedKVStore::new(&path)), bus);
        let history = reopened.read_all().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], record(2));

        assert!(reopened.remove("id-0002").unwrap());
        assert!(!reopened.remove("id-0002").unwrap());
        assert_eq!(
            events.try_recv().unwrap(),
            Some(PipelineEvent::PurchaseRemoved {
                id: "id-0002".into()
            })
        );

        reopened.clear().unwrap();
        assert!(reopened.read_all().unwrap().is_empty());
    }
}

//! Purchase Ledger Service - Core business logic

use crate::domain::schema::{backfill_v0, parse_version};
use crate::domain::{
    validate_value, LedgerError, LedgerResult, MigrationOutcome, PurchaseRecord,
    CURRENT_VERSION, HISTORY_KEY, VERSION_KEY,
};
use crate::ports::inbound::PurchaseLedgerApi;
use crate::ports::outbound::KeyValueStore;
use glow_telemetry::{
    LEDGER_INVALID_RECORDS, LEDGER_MIGRATIONS, LEDGER_QUOTA_EVICTIONS, LEDGER_RESETS,
    LEDGER_WRITES,
};
use parking_lot::Mutex;
use serde_json::Value;
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, PipelineEvent, Subscription};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Purchase Ledger Service implementation
///
/// Generic over the storage port; `S` may be unsized so a runtime can pick
/// the store at startup and hold it as `Arc<dyn KeyValueStore>`.
pub struct PurchaseLedger<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
    bus: Arc<InMemoryEventBus>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> PurchaseLedger<S> {
    pub fn new(store: Arc<S>, bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            store,
            bus,
            write_lock: Mutex::new(()),
        }
    }

    /// Ledger with a private event bus.
    pub fn with_store(store: Arc<S>) -> Self {
        Self::new(store, Arc::new(InMemoryEventBus::new()))
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Subscribe to ledger change notifications.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe(EventFilter::topics(vec![EventTopic::Ledger]))
    }

    /// Relay a change made by another writer sharing the same storage.
    ///
    /// Returns `true` when `key` belongs to the ledger and a notification
    /// was published.
    pub fn notify_external_change(&self, key: &str) -> bool {
        if key != HISTORY_KEY && key != VERSION_KEY {
            return false;
        }
        debug!("[gp-02] External change to {}", key);
        self.bus.publish_now(PipelineEvent::LedgerExternallyChanged {
            key: key.to_string(),
        });
        true
    }

    // =========================================================================
    // Locked internals. Callers hold `write_lock`.
    // =========================================================================

    fn migrate_locked(&self) -> LedgerResult<MigrationOutcome> {
        let raw_version = self.store.get(VERSION_KEY)?;
        let version = parse_version(raw_version.as_deref());

        if version == CURRENT_VERSION {
            return Ok(MigrationOutcome::UpToDate);
        }
        if version > CURRENT_VERSION {
            warn!(
                "[gp-02] Stored schema version {} is newer than {}, leaving data untouched",
                version, CURRENT_VERSION
            );
            return Ok(MigrationOutcome::NewerVersion(version));
        }

        let mut records = 0;
        if let Some(blob) = self.store.get(HISTORY_KEY)? {
            match serde_json::from_str::<Value>(&blob) {
                Ok(Value::Array(mut entries)) => {
                    entries.iter_mut().for_each(backfill_v0);
                    records = entries.len();
                    let migrated = serde_json::to_string(&entries)?;
                    self.store.set(HISTORY_KEY, &migrated)?;
                }
                // Left for read_all to discard
                Ok(_) | Err(_) => {
                    warn!("[gp-02] Unreadable history during migration, skipping data rewrite");
                }
            }
        }

        self.store.set(VERSION_KEY, &CURRENT_VERSION.to_string())?;
        LEDGER_MIGRATIONS.inc();
        info!(
            "[gp-02] Migrated purchase history from v{} to v{} ({} records)",
            version, CURRENT_VERSION, records
        );

        Ok(MigrationOutcome::Migrated { records })
    }

    fn read_all_locked(&self) -> LedgerResult<Vec<PurchaseRecord>> {
        self.migrate_locked()?;

        let Some(blob) = self.store.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        let entries = match serde_json::from_str::<Value>(&blob) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => return self.reset_corrupted("history is not an array"),
            Err(e) => return self.reset_corrupted(&e.to_string()),
        };

        let mut records: Vec<PurchaseRecord> = entries
            .into_iter()
            .filter_map(|entry| {
                if let Err(errors) = validate_value(&entry) {
                    warn!("[gp-02] Dropping invalid purchase entry: {}", errors.join(", "));
                    LEDGER_INVALID_RECORDS.inc();
                    return None;
                }
                match serde_json::from_value::<PurchaseRecord>(entry) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("[gp-02] Dropping undecodable purchase entry: {}", e);
                        LEDGER_INVALID_RECORDS.inc();
                        None
                    }
                }
            })
            .collect();

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    fn reset_corrupted(&self, reason: &str) -> LedgerResult<Vec<PurchaseRecord>> {
        error!("[gp-02] Corrupted purchase data, clearing: {}", reason);
        self.store.remove(HISTORY_KEY)?;
        LEDGER_RESETS.inc();
        self.bus.publish_now(PipelineEvent::LedgerReset {
            reason: reason.to_string(),
        });
        Ok(Vec::new())
    }

    fn write_history(&self, history: &[PurchaseRecord]) -> LedgerResult<()> {
        let blob = serde_json::to_string(history)?;
        self.store.set(HISTORY_KEY, &blob)?;
        Ok(())
    }

    /// Keep the newest half, then retry the append once.
    fn append_after_eviction(
        &self,
        record: PurchaseRecord,
        existing: Vec<PurchaseRecord>,
    ) -> LedgerResult<Vec<PurchaseRecord>> {
        let half = existing.len() / 2;
        let removed = existing.len() - half;
        warn!(
            "[gp-02] Storage quota exceeded, evicting {} oldest purchases",
            removed
        );

        let retained: Vec<PurchaseRecord> = existing.into_iter().take(half).collect();
        if let Err(e) = self.write_history(&retained) {
            return Err(write_failed(record, &e));
        }
        LEDGER_QUOTA_EVICTIONS.inc();
        self.bus.publish_now(PipelineEvent::LedgerPruned {
            removed,
            retained: half,
        });

        let mut updated = Vec::with_capacity(retained.len() + 1);
        updated.push(record);
        updated.extend(retained);

        match self.write_history(&updated) {
            Ok(()) => Ok(updated),
            Err(e) => {
                error!("[gp-02] Retry after quota eviction failed: {}", e);
                let record = updated.swap_remove(0);
                Err(write_failed(record, &e))
            }
        }
    }

    fn publish_recorded(&self, record: &PurchaseRecord) {
        self.bus.publish_now(PipelineEvent::PurchaseRecorded {
            id: record.id.clone(),
            signature: record.signature.clone(),
            status: record.status.to_string(),
        });
    }
}

fn write_failed(record: PurchaseRecord, cause: &LedgerError) -> LedgerError {
    LEDGER_WRITES.with_label_values(&["failed"]).inc();
    LedgerError::WriteFailed {
        record: Box::new(record),
        reason: cause.to_string(),
    }
}

fn is_quota(err: &LedgerError) -> bool {
    matches!(err, LedgerError::Storage(fault) if fault.is_quota())
}

impl<S: KeyValueStore + ?Sized> PurchaseLedgerApi for PurchaseLedger<S> {
    fn append(&self, record: PurchaseRecord) -> LedgerResult<Vec<PurchaseRecord>> {
        record.validate()?;

        let _guard = self.write_lock.lock();
        let existing = self.read_all_locked()?;

        if existing.iter().any(|r| r.signature == record.signature) {
            warn!(
                "[gp-02] Duplicate purchase detected, skipping: {}",
                record.signature
            );
            LEDGER_WRITES.with_label_values(&["duplicate"]).inc();
            return Ok(existing);
        }

        let mut updated = Vec::with_capacity(existing.len() + 1);
        updated.push(record.clone());
        updated.extend(existing.iter().cloned());

        let history = match self.write_history(&updated) {
            Ok(()) => updated,
            Err(e) if is_quota(&e) => self.append_after_eviction(record.clone(), existing)?,
            Err(e) => {
                error!("[gp-02] Error saving purchase: {}", e);
                return Err(write_failed(record, &e));
            }
        };

        LEDGER_WRITES.with_label_values(&["appended"]).inc();
        info!(
            signature = %record.signature,
            status = %record.status,
            "[gp-02] Purchase recorded"
        );
        self.publish_recorded(&record);
        Ok(history)
    }

    fn read_all(&self) -> LedgerResult<Vec<PurchaseRecord>> {
        let _guard = self.write_lock.lock();
        self.read_all_locked()
    }

    fn get_by_id(&self, id: &str) -> LedgerResult<Option<PurchaseRecord>> {
        Ok(self.read_all()?.into_iter().find(|r| r.id == id))
    }

    fn remove(&self, id: &str) -> LedgerResult<bool> {
        let _guard = self.write_lock.lock();
        let records = self.read_all_locked()?;
        let before = records.len();
        let filtered: Vec<PurchaseRecord> = records.into_iter().filter(|r| r.id != id).collect();

        if filtered.len() == before {
            return Ok(false);
        }

        self.write_history(&filtered)?;
        self.bus.publish_now(PipelineEvent::PurchaseRemoved { id: id.to_string() });
        Ok(true)
    }

    fn clear(&self) -> LedgerResult<()> {
        let _guard = self.write_lock.lock();
        self.store.remove(HISTORY_KEY)?;
        self.store.remove(VERSION_KEY)?;
        info!("[gp-02] Purchase history cleared");
        self.bus.publish_now(PipelineEvent::LedgerCleared);
        Ok(())
    }

    fn migrate(&self) -> LedgerResult<MigrationOutcome> {
        let _guard = self.write_lock.lock();
        self.migrate_locked()
    }
}

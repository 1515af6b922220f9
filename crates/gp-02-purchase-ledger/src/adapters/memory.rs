//! In-memory key-value store.

use crate::domain::errors::StorageFault;
use crate::ports::outbound::KeyValueStore;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory key-value store for tests and embedding.
///
/// Supports a per-value byte quota (mirroring browser storage limits) and a
/// queue of injected write faults.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: RwLock<HashMap<String, String>>,
    max_value_bytes: RwLock<Option<usize>>,
    injected_faults: Mutex<VecDeque<StorageFault>>,
    writes: AtomicU64,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects any value longer than `max_value_bytes`.
    pub fn with_quota(max_value_bytes: usize) -> Self {
        let store = Self::default();
        store.set_quota(Some(max_value_bytes));
        store
    }

    /// Change or lift the quota.
    pub fn set_quota(&self, max_value_bytes: Option<usize>) {
        *self.max_value_bytes.write() = max_value_bytes;
    }

    /// Fail the next `set` or `remove` with `fault`. Faults queue up and
    /// are consumed one per write.
    pub fn inject_fault(&self, fault: StorageFault) {
        self.injected_faults.lock().push_back(fault);
    }

    /// Successful `set` calls so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    fn take_fault(&self) -> Option<StorageFault> {
        self.injected_faults.lock().pop_front()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageFault> {
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageFault> {
        if let Some(fault) = self.take_fault() {
            return Err(fault);
        }

        if let Some(limit) = *self.max_value_bytes.read() {
            if value.len() > limit {
                return Err(StorageFault::QuotaExceeded {
                    key: key.to_string(),
                    attempted_bytes: value.len(),
                    limit_bytes: limit,
                });
            }
        }

        self.data.write().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageFault> {
        if let Some(fault) = self.take_fault() {
            return Err(fault);
        }
        self.data.write().remove(key);
        Ok(())
    }
}

//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Purchase Ledger service.
//!
//! These are the interfaces the host application implements. In a browser
//! host this is local storage; [`crate::adapters`] provides an in-memory and
//! a file-backed store.

use crate::domain::errors::StorageFault;

/// Abstract string key-value storage.
///
/// Methods take `&self`; implementations provide their own interior
/// mutability so one store can be shared between a ledger and its host.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, StorageFault>;

    /// Set a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageFault>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageFault>;
}

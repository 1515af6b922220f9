//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Purchase Ledger subsystem.

use crate::domain::{LedgerResult, MigrationOutcome, PurchaseRecord};

/// Primary API for the Purchase Ledger subsystem.
///
/// The ledger is the single writer of purchase history and the authority on
/// deduplication. All reads see migrated, validated data, newest first.
pub trait PurchaseLedgerApi: Send + Sync {
    /// Append a record.
    ///
    /// Returns the resulting history. A record whose signature is already
    /// present leaves the history unchanged and is not an error.
    ///
    /// ## Errors
    ///
    /// - `Validation`: record failed schema checks, nothing written
    /// - `WriteFailed`: storage rejected the write even after evicting the
    ///   oldest half of the history
    fn append(&self, record: PurchaseRecord) -> LedgerResult<Vec<PurchaseRecord>>;

    /// All valid records, newest first.
    ///
    /// A corrupted blob is discarded and reads as empty.
    fn read_all(&self) -> LedgerResult<Vec<PurchaseRecord>>;

    /// Find a record by id.
    fn get_by_id(&self, id: &str) -> LedgerResult<Option<PurchaseRecord>>;

    /// Delete a record by id. `Ok(false)` when no record matched.
    fn remove(&self, id: &str) -> LedgerResult<bool>;

    /// Remove the history and its version marker.
    fn clear(&self) -> LedgerResult<()>;

    /// Bring stored data up to the current schema version. Idempotent.
    fn migrate(&self) -> LedgerResult<MigrationOutcome>;
}

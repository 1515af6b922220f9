//! # Purchase Ledger (gp-02)
//!
//! Durable, schema-validated, deduplicated history of completed payments.
//!
//! ## Storage Layout
//!
//! ```text
//! purchaseHistory          JSON array, newest first
//! purchaseHistory_version  "1"
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Unique signatures | Appending a known signature is a no-op |
//! | Valid reads | Entries failing schema checks never reach callers |
//! | Corruption recovery | An unreadable blob is cleared and reads as empty |
//! | Quota recovery | One eviction of the oldest half, then one retry |
//! | Idempotent migration | Re-running migration changes nothing |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Records, schema and errors
//! - `ports/` - Port traits (inbound API, outbound storage SPI)
//! - `adapters/` - In-memory and file-backed stores
//! - `service.rs` - Application service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use gp_02_purchase_ledger::{InMemoryKVStore, PurchaseLedger, PurchaseLedgerApi};
//!
//! let ledger = PurchaseLedger::with_store(Arc::new(InMemoryKVStore::new()));
//! ledger.append(record)?;
//! let history = ledger.read_all()?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
pub use domain::record::UNKNOWN_WALLET;
pub use domain::{
    validate_value, LedgerError, LedgerResult, MigrationOutcome, PurchaseRecord, PurchaseStatus,
    StorageFault, CURRENT_VERSION, HISTORY_KEY, VERSION_KEY,
};
pub use ports::inbound::PurchaseLedgerApi;
pub use ports::outbound::KeyValueStore;
pub use service::PurchaseLedger;

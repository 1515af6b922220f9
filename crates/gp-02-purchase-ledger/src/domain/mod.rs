//! Domain layer: records, schema and errors.

pub mod errors;
pub mod record;
pub mod schema;

pub use errors::{LedgerError, LedgerResult, StorageFault};
pub use record::{validate_value, PurchaseRecord, PurchaseStatus};
pub use schema::{MigrationOutcome, CURRENT_VERSION, HISTORY_KEY, VERSION_KEY};

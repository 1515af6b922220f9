//! Error types for the Purchase Ledger subsystem

use super::record::PurchaseRecord;
use thiserror::Error;

/// Failures reported by a [`crate::ports::outbound::KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageFault {
    /// The value does not fit in the remaining quota.
    #[error("Storage quota exceeded writing {key}: {attempted_bytes} bytes, limit {limit_bytes}")]
    QuotaExceeded {
        key: String,
        attempted_bytes: usize,
        limit_bytes: usize,
    },

    /// Storage cannot be reached at all (disabled, private mode, etc.).
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage I/O error: {message}")]
    Io { message: String },
}

impl StorageFault {
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Purchase ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Record failed schema validation; nothing was written
    #[error("Invalid purchase data: {}", errors.join(", "))]
    Validation { errors: Vec<String> },

    #[error(transparent)]
    Storage(#[from] StorageFault),

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },

    /// A valid record could not be persisted, even after quota recovery.
    /// The record is handed back so the caller can keep it in memory.
    #[error("Failed to persist purchase {}: {reason}", record.signature)]
    WriteFailed {
        record: Box<PurchaseRecord>,
        reason: String,
    },
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

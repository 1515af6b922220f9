//! # Pipeline Events
//!
//! Defines all event types that flow through the shared bus.
//!
//! Ledger events are change notifications: a history view that receives one
//! re-reads the ledger. They carry identifiers only, never the records, so a
//! dropped or lagged event can never leave a view with stale data it trusts.

use serde::{Deserialize, Serialize};

/// Subsystem identifier of the purchase ledger.
pub const LEDGER_SUBSYSTEM: u8 = 2;

/// Subsystem identifier of the payment controller.
pub const CONTROLLER_SUBSYSTEM: u8 = 4;

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineEvent {
    // =========================================================================
    // SUBSYSTEM 2: PURCHASE LEDGER
    // =========================================================================
    /// A purchase record was written.
    PurchaseRecorded {
        id: String,
        signature: String,
        /// `"confirmed"` or `"pending"`.
        status: String,
    },

    /// A purchase record was deleted by id.
    PurchaseRemoved { id: String },

    /// The whole ledger was cleared.
    LedgerCleared,

    /// A corrupted ledger blob was discarded during a read.
    LedgerReset { reason: String },

    /// Oldest records were evicted to recover from a storage quota failure.
    LedgerPruned { removed: usize, retained: usize },

    /// Another writer (e.g. another browser tab) changed a ledger key.
    LedgerExternallyChanged { key: String },

    // =========================================================================
    // SUBSYSTEM 4: PAYMENT CONTROLLER
    // =========================================================================
    /// A payment attempt settled successfully.
    PaymentSettled {
        signature: String,
        /// `true` when confirmation was observed, `false` when pending.
        confirmed: bool,
    },

    /// A payment attempt failed.
    PaymentFailed {
        /// Stable error kind label.
        kind: String,
        message: String,
    },
}

impl PipelineEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::PurchaseRecorded { .. }
            | Self::PurchaseRemoved { .. }
            | Self::LedgerCleared
            | Self::LedgerReset { .. }
            | Self::LedgerPruned { .. }
            | Self::LedgerExternallyChanged { .. } => EventTopic::Ledger,
            Self::PaymentSettled { .. } | Self::PaymentFailed { .. } => EventTopic::Payment,
        }
    }

    /// Get the source subsystem ID for this event.
    #[must_use]
    pub fn source_subsystem(&self) -> u8 {
        match self.topic() {
            EventTopic::Payment => CONTROLLER_SUBSYSTEM,
            _ => LEDGER_SUBSYSTEM,
        }
    }

    /// Whether a history view should re-read the ledger after this event.
    #[must_use]
    pub fn invalidates_history(&self) -> bool {
        self.topic() == EventTopic::Ledger
    }
}

/// Event topics for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Purchase ledger changes.
    Ledger,
    /// Payment attempt outcomes.
    Payment,
    /// All events.
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &PipelineEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}

//! Per-attempt state machine.
//!
//! ```text
//! [IDLE] ──started──→ [SUBMITTING] ──settled(confirmed)──→ [CONFIRMED]
//!   ↑                      │  └──────settled(pending)────→ [PENDING]
//!   │                      └───────────failed────────────→ [FAILED]
//!   └──────────────── reset (from any phase) ─────────────────┘
//! ```
//!
//! A new attempt may start from `Idle` or from any terminal phase; starting
//! clears the previous attempt's error, signature and ledger warning.

use gp_01_error_taxonomy::ClassifiedError;
use gp_03_payment_engine::TransactionOutcome;
use serde::{Deserialize, Serialize};
use shared_types::TxSignature;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptPhase {
    #[default]
    Idle,
    Submitting,
    Confirmed,
    Pending,
    Failed,
}

impl AttemptPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Pending | Self::Failed)
    }
}

impl fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs driving [`AttemptPhase`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptEvent {
    Started,
    Settled { confirmed: bool },
    Failed,
    Reset,
}

impl AttemptPhase {
    /// Next phase for `event`, or `None` when the transition is not allowed.
    pub fn next(self, event: AttemptEvent) -> Option<Self> {
        match (self, event) {
            (_, AttemptEvent::Reset) => Some(Self::Idle),
            (Self::Submitting, AttemptEvent::Started) => None,
            (_, AttemptEvent::Started) => Some(Self::Submitting),
            (Self::Submitting, AttemptEvent::Settled { confirmed: true }) => Some(Self::Confirmed),
            (Self::Submitting, AttemptEvent::Settled { confirmed: false }) => Some(Self::Pending),
            (Self::Submitting, AttemptEvent::Failed) => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Read-only view of the current attempt for UI callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    pub phase: AttemptPhase,
    /// An attempt is between `Submitting` and a terminal phase.
    pub loading: bool,
    /// Settled as confirmed or pending.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<TxSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ClassifiedError>,
    /// Set when the payment succeeded but its ledger record was not written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_warning: Option<String>,
}

/// Mutable attempt state owned by the controller.
#[derive(Debug, Default)]
pub struct AttemptState {
    snapshot: AttemptSnapshot,
}

impl AttemptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AttemptPhase {
        self.snapshot.phase
    }

    pub fn snapshot(&self) -> AttemptSnapshot {
        self.snapshot.clone()
    }

    /// Apply `event`. Returns the new phase, or `None` (state untouched)
    /// when the transition is not allowed from the current phase.
    fn apply(&mut self, event: AttemptEvent) -> Option<AttemptPhase> {
        let next = self.snapshot.phase.next(event)?;
        self.snapshot.phase = next;
        self.snapshot.loading = next == AttemptPhase::Submitting;
        Some(next)
    }

    pub fn begin(&mut self) -> Option<AttemptPhase> {
        let phase = self.apply(AttemptEvent::Started)?;
        self.snapshot = AttemptSnapshot {
            phase,
            loading: true,
            ..AttemptSnapshot::default()
        };
        Some(phase)
    }

    pub fn settle(&mut self, outcome: &TransactionOutcome) -> Option<AttemptPhase> {
        let phase = self.apply(AttemptEvent::Settled {
            confirmed: outcome.confirmed,
        })?;
        self.snapshot.success = true;
        self.snapshot.signature = Some(outcome.signature.clone());
        self.snapshot.explorer_url = Some(outcome.explorer_url.clone());
        Some(phase)
    }

    pub fn fail(&mut self, error: ClassifiedError) -> Option<AttemptPhase> {
        let phase = self.apply(AttemptEvent::Failed)?;
        self.snapshot.error = Some(error);
        Some(phase)
    }

    pub fn warn_ledger(&mut self, warning: impl Into<String>) {
        self.snapshot.ledger_warning = Some(warning.into());
    }

    pub fn reset(&mut self) {
        self.snapshot = AttemptSnapshot::default();
    }
}

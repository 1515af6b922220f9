//! Bounded confirmation policy.
//!
//! ```text
//! poll ──not yet──→ sleep min(n × step, cap) ──→ poll ... ──budget spent──→ Pending
//!   │
//!   ├──confirmed/finalized──→ Confirmed
//!   └──execution error──────→ Failed (terminal)
//! ```

use std::time::Duration;

/// Limits for the confirmation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Maximum status polls.
    pub max_attempts: u32,
    /// Wall-clock budget measured from the first poll.
    pub timeout: Duration,
    /// Backoff grows by this much per attempt.
    pub backoff_step: Duration,
    /// Upper bound on a single backoff.
    pub max_backoff: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            timeout: Duration::from_secs(30),
            backoff_step: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(3000),
        }
    }
}

impl ConfirmationPolicy {
    /// Backoff after the `attempt`-th poll (1-based), before capping at the
    /// remaining budget.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt).min(self.max_backoff)
    }
}

/// Tracks one confirmation run against its policy.
///
/// This is the only place the loop asks whether to keep going, so a
/// cancellation signal would be checked here.
#[derive(Debug, Clone)]
pub struct ConfirmationBudget {
    policy: ConfirmationPolicy,
    started_at: Duration,
    attempts: u32,
}

impl ConfirmationBudget {
    /// Start a budget at clock reading `now`.
    pub fn start(policy: ConfirmationPolicy, now: Duration) -> Self {
        Self {
            policy,
            started_at: now,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.policy.timeout.saturating_sub(self.elapsed(now))
    }

    /// Whether another poll may be issued.
    pub fn can_poll(&self, now: Duration) -> bool {
        self.attempts < self.policy.max_attempts && self.remaining(now) > Duration::ZERO
    }

    pub fn record_poll(&mut self) {
        self.attempts += 1;
    }

    /// Sleep before the next poll, or `None` when the budget is spent.
    pub fn next_backoff(&self, now: Duration) -> Option<Duration> {
        if !self.can_poll(now) {
            return None;
        }
        Some(self.policy.backoff_for(self.attempts).min(self.remaining(now)))
    }
}

/// How a confirmation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationVerdict {
    Confirmed { attempts: u32 },
    /// Budget spent without a verdict from the chain.
    Pending { attempts: u32 },
    /// The chain reported an execution error.
    Failed { reason: String },
}

//! # Glow Telemetry
//!
//! Logging and metrics for the Glow-Pay payment pipeline.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with an `EnvFilter`, plain or JSON output
//! - **Metrics**: Prometheus counters for payments, confirmations and the ledger
//!
//! ## Usage
//!
//! ```rust,ignore
//! use glow_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GLOW_SERVICE_NAME` | `glow-pay` | Service name in logs |
//! | `GLOW_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `GLOW_JSON_LOGS` | `false` | Emit JSON lines |
//! | `GLOW_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `GLOW_NETWORK` | `devnet` | Network label |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, StructuredLogger};
pub use metrics::{
    encode_metrics, register_metrics, CONFIRMATION_POLLS, CONFIRMATION_WAIT,
    LEDGER_INVALID_RECORDS, LEDGER_MIGRATIONS, LEDGER_QUOTA_EVICTIONS, LEDGER_RESETS,
    LEDGER_WRITES, OVERLAPPING_ATTEMPTS, PAYMENTS_IN_FLIGHT, PAYMENT_ATTEMPTS, PAYMENT_FAILURES,
    PAYMENT_OUTCOMES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Metrics first so early log lines can already be counted
    register_metrics()?;
    let logger = init_logging(config)?;

    Ok(TelemetryGuard { logger })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    logger: StructuredLogger,
}

impl TelemetryGuard {
    /// The installed logger.
    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.logger.service_name(), "Shutting down telemetry");
    }
}

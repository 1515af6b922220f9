//! Structured logging.
//!
//! Installs a global `tracing` subscriber filtered by an `EnvFilter`. With
//! `json_logs` enabled every event is emitted as one JSON object per line:
//! - `timestamp`: ISO 8601 timestamp
//! - `level`: Log level (trace, debug, info, warn, error)
//! - `target`: Module path of the emitting crate
//! - `fields`: Message plus structured context fields

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Handle returned once the global subscriber is installed.
#[derive(Debug)]
pub struct StructuredLogger {
    service_name: String,
    json: bool,
}

impl StructuredLogger {
    /// Service name the logger was initialized for.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Whether events are emitted as JSON.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Parse the configured level into an `EnvFilter`.
pub fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::LoggerInit`] when a global subscriber has
/// already been set in this process.
pub fn init_logging(config: &TelemetryConfig) -> Result<StructuredLogger, TelemetryError> {
    let filter = build_filter(&config.log_level)?;

    let json_layer = (config.console_output && config.json_logs)
        .then(|| fmt::layer().json().with_target(true).with_current_span(false));
    let text_layer =
        (config.console_output && !config.json_logs).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggerInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );

    Ok(StructuredLogger {
        service_name: config.service_name.clone(),
        json: config.json_logs,
    })
}

//! Prometheus metrics for the payment pipeline.
//!
//! All metrics follow the naming convention: `glow_<subsystem>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., payment_attempts_total)
//! - **Gauge**: Value that can go up or down (e.g., payments_in_flight)
//! - **Histogram**: Distribution of values (e.g., confirmation_wait_seconds)

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Histogram, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // PAYMENT ENGINE METRICS (Subsystem 3)
    // =========================================================================

    /// Payment attempts that reached the engine
    pub static ref PAYMENT_ATTEMPTS: Counter = Counter::new(
        "glow_payment_attempts_total",
        "Total number of payment attempts submitted to the engine"
    ).expect("metric creation failed");

    /// Payment outcomes
    pub static ref PAYMENT_OUTCOMES: CounterVec = CounterVec::new(
        Opts::new("glow_payment_outcomes_total", "Payment attempts by final outcome"),
        &["status"]  // status: confirmed/pending/failed
    ).expect("metric creation failed");

    /// Classified failures
    pub static ref PAYMENT_FAILURES: CounterVec = CounterVec::new(
        Opts::new("glow_payment_failures_total", "Payment failures by error kind"),
        &["kind"]
    ).expect("metric creation failed");

    /// Signature status polls issued while waiting for confirmation
    pub static ref CONFIRMATION_POLLS: Counter = Counter::new(
        "glow_payment_confirmation_polls_total",
        "Total signature status queries issued during confirmation"
    ).expect("metric creation failed");

    /// Time spent waiting for confirmation
    pub static ref CONFIRMATION_WAIT: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "glow_payment_confirmation_wait_seconds",
            "Time between submission and a confirmation verdict"
        ).buckets(vec![0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0])
    ).expect("metric creation failed");

    // =========================================================================
    // PAYMENT CONTROLLER METRICS (Subsystem 4)
    // =========================================================================

    /// Attempts currently in flight
    pub static ref PAYMENTS_IN_FLIGHT: Gauge = Gauge::new(
        "glow_controller_payments_in_flight",
        "Number of payment attempts currently in progress"
    ).expect("metric creation failed");

    /// Attempts rejected because another one was running
    pub static ref OVERLAPPING_ATTEMPTS: Counter = Counter::new(
        "glow_controller_overlapping_attempts_total",
        "Payment attempts refused while another attempt was in flight"
    ).expect("metric creation failed");

    // =========================================================================
    // PURCHASE LEDGER METRICS (Subsystem 2)
    // =========================================================================

    /// Ledger append outcomes
    pub static ref LEDGER_WRITES: CounterVec = CounterVec::new(
        Opts::new("glow_ledger_writes_total", "Ledger append attempts by outcome"),
        &["outcome"]  // outcome: appended/duplicate/failed
    ).expect("metric creation failed");

    /// Quota recoveries that evicted old records
    pub static ref LEDGER_QUOTA_EVICTIONS: Counter = Counter::new(
        "glow_ledger_quota_evictions_total",
        "Times the ledger evicted its oldest half after a quota failure"
    ).expect("metric creation failed");

    /// Corrupted blobs discarded
    pub static ref LEDGER_RESETS: Counter = Counter::new(
        "glow_ledger_corrupted_resets_total",
        "Times an unreadable ledger blob was discarded"
    ).expect("metric creation failed");

    /// Stored entries dropped on read because they failed validation
    pub static ref LEDGER_INVALID_RECORDS: Counter = Counter::new(
        "glow_ledger_invalid_records_total",
        "Stored entries skipped because they failed validation"
    ).expect("metric creation failed");

    /// Schema migrations performed
    pub static ref LEDGER_MIGRATIONS: Counter = Counter::new(
        "glow_ledger_migrations_total",
        "Schema migrations applied to stored history"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; collectors that are already registered are
/// left as they are.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Engine
        Box::new(PAYMENT_ATTEMPTS.clone()),
        Box::new(PAYMENT_OUTCOMES.clone()),
        Box::new(PAYMENT_FAILURES.clone()),
        Box::new(CONFIRMATION_POLLS.clone()),
        Box::new(CONFIRMATION_WAIT.clone()),
        // Controller
        Box::new(PAYMENTS_IN_FLIGHT.clone()),
        Box::new(OVERLAPPING_ATTEMPTS.clone()),
        // Ledger
        Box::new(LEDGER_WRITES.clone()),
        Box::new(LEDGER_QUOTA_EVICTIONS.clone()),
        Box::new(LEDGER_RESETS.clone()),
        Box::new(LEDGER_INVALID_RECORDS.clone()),
        Box::new(LEDGER_MIGRATIONS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

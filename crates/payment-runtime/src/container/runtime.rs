//! # Payment Runtime
//!
//! Builds every subsystem in dependency order and holds them for the
//! lifetime of the host.
//!
//! ```text
//! Level 0: event bus, clock, RPC client, ledger store
//! Level 1: purchase ledger (store, bus), payment engine (RPC, clock)
//! Level 2: payment controller (engine, ledger, bus)
//! ```

use crate::container::config::{ConfigError, RuntimeConfig};
use glow_telemetry::{init_telemetry, TelemetryError, TelemetryGuard};
use gp_02_purchase_ledger::{
    FileBackedKVStore, InMemoryKVStore, KeyValueStore, LedgerError, PurchaseLedger,
    PurchaseLedgerApi,
};
use gp_03_payment_engine::{Clock, JsonRpcSolanaClient, PaymentEngine, SolanaRpc, TokioClock};
use gp_04_payment_controller::PaymentController;
use shared_bus::{InMemoryEventBus, Subscription};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Engine over runtime-selected adapters.
pub type RuntimeEngine = PaymentEngine<dyn SolanaRpc, dyn Clock>;

/// Ledger over a runtime-selected store.
pub type RuntimeLedger = PurchaseLedger<dyn KeyValueStore>;

pub type RuntimeController = PaymentController<RuntimeEngine, RuntimeLedger>;

/// Startup failures.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Fully wired payment pipeline.
pub struct PaymentRuntime {
    config: RuntimeConfig,
    bus: Arc<InMemoryEventBus>,
    engine: Arc<RuntimeEngine>,
    ledger: Arc<RuntimeLedger>,
    controller: Arc<RuntimeController>,
}

impl PaymentRuntime {
    /// Wire the pipeline against the public RPC endpoints and the configured
    /// ledger store.
    #[instrument(name = "payment_runtime_init", skip(config))]
    pub fn build(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rpc: Arc<dyn SolanaRpc> = Arc::new(JsonRpcSolanaClient::new(
            config.payment.rpc_endpoints(),
            config.payment.request_timeout,
        ));
        let store: Arc<dyn KeyValueStore> = match &config.ledger.storage_path {
            Some(path) => {
                info!(path = %path.display(), "[runtime] Ledger backed by file");
                Arc::new(FileBackedKVStore::new(path))
            }
            None => {
                info!("[runtime] Ledger held in memory");
                Arc::new(InMemoryKVStore::new())
            }
        };

        Self::with_adapters(config, rpc, Arc::new(TokioClock::new()), store)
    }

    /// Wire the pipeline over caller-supplied adapters.
    pub fn with_adapters(
        config: RuntimeConfig,
        rpc: Arc<dyn SolanaRpc>,
        clock: Arc<dyn Clock>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.ledger.bus_capacity));

        let ledger: Arc<RuntimeLedger> = Arc::new(PurchaseLedger::new(store, bus.clone()));
        migrate_on_startup(ledger.as_ref());

        let engine = Arc::new(PaymentEngine::new(config.payment.clone(), rpc, clock));
        let controller = Arc::new(PaymentController::new(
            engine.clone(),
            ledger.clone(),
            bus.clone(),
        ));

        info!(
            cluster = %config.payment.cluster.as_str(),
            merchant = %config.payment.merchant_address,
            "[runtime] Payment pipeline ready"
        );

        Ok(Self {
            config,
            bus,
            engine,
            ledger,
            controller,
        })
    }

    /// Install logging and metrics, then [`PaymentRuntime::build`].
    ///
    /// Logging can be installed once per process; the guard must outlive the
    /// runtime.
    pub fn bootstrap(config: RuntimeConfig) -> Result<(Self, TelemetryGuard), RuntimeError> {
        let guard = init_telemetry(&config.telemetry)?;
        let runtime = Self::build(config)?;
        Ok((runtime, guard))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    pub fn engine(&self) -> &Arc<RuntimeEngine> {
        &self.engine
    }

    pub fn ledger(&self) -> &Arc<RuntimeLedger> {
        &self.ledger
    }

    pub fn controller(&self) -> &Arc<RuntimeController> {
        &self.controller
    }

    /// Ledger change notifications for a history view.
    pub fn subscribe_history(&self) -> Subscription {
        self.ledger.subscribe()
    }
}

/// Migration failures are not fatal: reads migrate lazily and retry.
fn migrate_on_startup(ledger: &RuntimeLedger) {
    match ledger.migrate() {
        Ok(outcome) => info!(?outcome, "[runtime] Ledger schema checked"),
        Err(LedgerError::Storage(fault)) => {
            warn!("[runtime] Ledger storage unavailable at startup: {}", fault)
        }
        Err(e) => warn!("[runtime] Ledger migration deferred: {}", e),
    }
}

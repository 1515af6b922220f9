//! # Payment Container
//!
//! Configuration and dependency wiring for the payment subsystems.

pub mod config;
pub mod runtime;

pub use config::{ConfigError, LedgerConfig, RuntimeConfig};
pub use runtime::{
    PaymentRuntime, RuntimeController, RuntimeEngine, RuntimeError, RuntimeLedger,
};

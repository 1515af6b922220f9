//! # Glow-Pay Payment Runtime
//!
//! Entry point for UI hosts: load a [`RuntimeConfig`], build a
//! [`PaymentRuntime`] and drive purchases through its controller.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (environment)
//! 2. Validate merchant address, RPC endpoints and confirmation budget
//! 3. Install logging and metrics
//! 4. Wire subsystems in dependency order
//! 5. Migrate the ledger schema

pub mod container;

pub use container::{
    ConfigError, LedgerConfig, PaymentRuntime, RuntimeConfig, RuntimeController, RuntimeEngine,
    RuntimeError, RuntimeLedger,
};

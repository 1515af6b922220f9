//! Cross-crate flows: runtime wiring, engine, controller, ledger and bus.

pub mod error_surface;
pub mod ledger_recovery;
pub mod payment_flow;

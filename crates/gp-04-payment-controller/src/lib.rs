//! # Payment Controller Subsystem (gp-04)
//!
//! Per-attempt state machine between the UI and the payment engine.
//!
//! ## Responsibilities
//!
//! - Refuse a second attempt while one is in flight
//! - Track `Idle → Submitting → {Confirmed, Pending, Failed}`
//! - Record settled payments in the purchase ledger
//! - Publish attempt outcomes on the shared bus
//!
//! Retrying is the engine's business; the controller runs each attempt once.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{AttemptEvent, AttemptPhase, AttemptSnapshot, AttemptState, PurchaseIntent};
pub use error::{ControllerError, ControllerResult};
pub use ports::inbound::PaymentControllerApi;
pub use service::PaymentController;

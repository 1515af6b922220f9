//! # Outbound Ports (Driven Ports)
//!
//! The controller drives the payment engine and the purchase ledger through
//! their own inbound APIs.

pub use gp_02_purchase_ledger::PurchaseLedgerApi;
pub use gp_03_payment_engine::{PaymentEngineApi, WalletCapability};

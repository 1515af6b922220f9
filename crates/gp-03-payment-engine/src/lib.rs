//! # Payment Engine Subsystem (gp-03)
//!
//! Turns "pay X native units to the merchant" into a submitted, and ideally
//! confirmed, on-chain transfer.
//!
//! ## Pipeline
//!
//! ```text
//! wallet? ─→ submit capable? ─→ amount ok? ─→ recipient ─→ balance ≥ amount + fee
//!                                                               │
//!        explorer link ←─ confirm (bounded) ←─ wallet.submit ←─ blockhash
//! ```
//!
//! Every failure leaves the engine as a [`ClassifiedError`]; a submitted
//! transaction whose confirmation is not observed in time comes back as a
//! pending [`TransactionOutcome`], never as an error.
//!
//! ## Ports
//!
//! - [`WalletCapability`]: key custody, signing and submission
//! - [`SolanaRpc`]: balance, blockhash and status reads
//! - [`Clock`]: monotonic time and sleeping for the confirmation loop

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{JsonRpcSolanaClient, ManualClock, TokioClock};
pub use config::{PaymentConfig, DEFAULT_MERCHANT_ADDRESS};
pub use domain::{
    estimate_fee_native, required_balance_native, ConfirmationBudget, ConfirmationPolicy,
    ConfirmationVerdict, PaymentRequest, PaymentValidation, ProductInfo, TransactionOutcome,
    TransferTransaction, BASE_FEE_LAMPORTS,
};
pub use error::{PaymentError, PaymentResult, RpcError, WalletError};
pub use gp_01_error_taxonomy::ClassifiedError;
pub use ports::inbound::PaymentEngineApi;
pub use ports::outbound::{
    Clock, CommitmentLevel, ConfirmedTransaction, SignatureStatus, SolanaRpc, WalletCapability,
};
pub use service::PaymentEngine;

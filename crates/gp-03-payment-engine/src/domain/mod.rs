//! Domain layer: requests, outcomes, transfers and the confirmation policy.

pub mod confirmation;
pub mod fees;
pub mod payment;
pub mod transfer;

pub use confirmation::{ConfirmationBudget, ConfirmationPolicy, ConfirmationVerdict};
pub use fees::{estimate_fee_native, required_balance_native, BASE_FEE_LAMPORTS};
pub use payment::{PaymentRequest, PaymentValidation, ProductInfo, TransactionOutcome};
pub use transfer::TransferTransaction;

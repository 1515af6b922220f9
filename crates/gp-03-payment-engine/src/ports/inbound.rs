//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Payment Engine subsystem.

use crate::domain::{PaymentRequest, TransactionOutcome};
use crate::ports::outbound::WalletCapability;
use async_trait::async_trait;
use gp_01_error_taxonomy::ClassifiedError;

/// Primary API for the Payment Engine subsystem.
#[async_trait]
pub trait PaymentEngineApi: Send + Sync {
    /// Validate, build, submit and confirm one native transfer.
    ///
    /// ## Ordering
    ///
    /// No network call is made until the wallet, its submit capability and
    /// the amount have been checked. The wallet is never asked to sign when
    /// the balance does not cover amount plus fee.
    ///
    /// ## Confirmation
    ///
    /// A transaction that is submitted but not confirmed within the policy
    /// budget is returned as `Ok` with `pending` set.
    ///
    /// ## Errors
    ///
    /// Every failure is classified into the closed error taxonomy.
    async fn submit_payment(
        &self,
        wallet: Option<&dyn WalletCapability>,
        request: PaymentRequest,
    ) -> Result<TransactionOutcome, ClassifiedError>;
}

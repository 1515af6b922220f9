//! # Inbound Ports (Driving Ports)
//!
//! The surface UI callers use to run purchases.

use crate::domain::{AttemptSnapshot, PurchaseIntent};
use crate::error::ControllerResult;
use async_trait::async_trait;
use gp_02_purchase_ledger::{LedgerResult, PurchaseRecord};
use gp_03_payment_engine::{TransactionOutcome, WalletCapability};

/// Primary API for the Payment Controller subsystem.
#[async_trait]
pub trait PaymentControllerApi: Send + Sync {
    /// Run one purchase attempt.
    ///
    /// Refused with `AttemptInFlight` while another attempt is running. On
    /// success the purchase is recorded in the ledger; a ledger failure is
    /// reported through the snapshot and never fails the purchase. Nothing is
    /// retried here.
    async fn process_purchase(
        &self,
        wallet: Option<&dyn WalletCapability>,
        intent: PurchaseIntent,
    ) -> ControllerResult<TransactionOutcome>;

    fn snapshot(&self) -> AttemptSnapshot;

    fn is_in_flight(&self) -> bool;

    /// Return to `Idle`, dropping the last attempt's outcome.
    fn reset(&self);

    /// Purchase history, newest first.
    fn history(&self) -> LedgerResult<Vec<PurchaseRecord>>;
}

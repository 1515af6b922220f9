//! Payment Engine Service - Core business logic

use crate::config::PaymentConfig;
use crate::domain::{
    required_balance_native, ConfirmationBudget, ConfirmationVerdict, PaymentRequest,
    PaymentValidation, TransactionOutcome, TransferTransaction,
};
use crate::error::{PaymentError, PaymentResult};
use crate::ports::inbound::PaymentEngineApi;
use crate::ports::outbound::{Clock, SolanaRpc, WalletCapability};
use async_trait::async_trait;
use glow_telemetry::{
    CONFIRMATION_POLLS, CONFIRMATION_WAIT, PAYMENT_ATTEMPTS, PAYMENT_FAILURES, PAYMENT_OUTCOMES,
};
use gp_01_error_taxonomy::{classify, ClassifiedError};
use shared_types::explorer::tx_url;
use shared_types::{lamports_to_sol, sol_to_lamports, ChainAddress, TxSignature};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Payment Engine Service implementation
///
/// Stateless per call: everything an attempt needs arrives as arguments or
/// through the injected ports.
pub struct PaymentEngine<R, C>
where
    R: SolanaRpc + ?Sized,
    C: Clock + ?Sized,
{
    config: PaymentConfig,
    rpc: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> PaymentEngine<R, C>
where
    R: SolanaRpc + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(config: PaymentConfig, rpc: Arc<R>, clock: Arc<C>) -> Self {
        Self { config, rpc, clock }
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }

    /// Request address when structurally valid, else the merchant.
    fn resolve_recipient(&self, requested: Option<&str>) -> PaymentResult<ChainAddress> {
        if let Some(address) = requested {
            match address.parse::<ChainAddress>() {
                Ok(parsed) => return Ok(parsed),
                Err(e) => warn!(
                    "[gp-03] Requested recipient {} rejected ({}), using merchant",
                    address, e
                ),
            }
        }
        self.config
            .merchant()
            .map_err(|_| PaymentError::InvalidRecipient)
    }

    async fn execute(
        &self,
        wallet: Option<&dyn WalletCapability>,
        request: &PaymentRequest,
    ) -> PaymentResult<TransactionOutcome> {
        // Preconditions: no network traffic until these pass
        let wallet = wallet.ok_or(PaymentError::WalletNotConnected)?;
        let sender = wallet.public_key().ok_or(PaymentError::WalletNotConnected)?;
        if !wallet.supports_submit() {
            return Err(PaymentError::WalletNotSupported);
        }

        let amount = request.amount_native;
        let lamports = match sol_to_lamports(amount) {
            Some(lamports) if amount > 0.0 && lamports > 0 => lamports,
            _ => return Err(PaymentError::InvalidAmount { amount }),
        };

        let recipient = self.resolve_recipient(request.recipient_address.as_deref())?;

        // Balance covers amount plus fee
        let balance = self
            .rpc
            .get_balance(&sender)
            .await
            .map_err(|e| PaymentError::BalanceUnavailable {
                reason: e.to_string(),
            })?;
        let available = lamports_to_sol(balance);
        let required = required_balance_native(amount);
        if available < required {
            return Err(PaymentError::InsufficientBalance {
                required,
                available,
            });
        }

        let blockhash = self.rpc.get_latest_blockhash().await.map_err(|e| {
            PaymentError::BlockhashUnavailable {
                reason: e.to_string(),
            }
        })?;
        let transaction = TransferTransaction::new(sender, recipient, lamports, blockhash);

        if let Some(product) = &request.memo {
            info!(
                product_id = %product.id,
                product_name = %product.name,
                amount,
                "[gp-03] Submitting payment"
            );
        }

        let signature = wallet.submit(&transaction).await.map_err(|e| {
            if e.is_user_cancellation() {
                PaymentError::UserRejected
            } else {
                PaymentError::SendFailed {
                    name: e.name,
                    reason: e.message,
                }
            }
        })?;
        info!(signature = %signature, lamports, "[gp-03] Transaction submitted");

        let explorer_url = tx_url(signature.as_str(), self.config.cluster);

        let outcome = match self.confirm(&signature).await {
            ConfirmationVerdict::Confirmed { attempts } => {
                info!(signature = %signature, attempt = attempts, "[gp-03] Transaction confirmed");
                let validation = self.validate_payment(&signature).await;
                TransactionOutcome::confirmed(signature, explorer_url, validation)
            }
            ConfirmationVerdict::Pending { attempts } => {
                warn!(
                    signature = %signature,
                    attempt = attempts,
                    "[gp-03] Transaction sent but confirmation pending"
                );
                TransactionOutcome::pending(signature, explorer_url)
            }
            ConfirmationVerdict::Failed { reason } => {
                return Err(PaymentError::TransactionFailed { reason });
            }
        };

        Ok(outcome.with_product(request.memo.clone()))
    }

    /// Poll the signature status within the confirmation budget.
    async fn confirm(&self, signature: &TxSignature) -> ConfirmationVerdict {
        let mut budget = ConfirmationBudget::start(self.config.confirmation, self.clock.now());

        let verdict = loop {
            if !budget.can_poll(self.clock.now()) {
                break ConfirmationVerdict::Pending {
                    attempts: budget.attempts(),
                };
            }

            budget.record_poll();
            CONFIRMATION_POLLS.inc();

            // A slow node must not stretch the wall-clock budget
            let remaining = budget.remaining(self.clock.now());
            let polled = tokio::select! {
                biased;
                result = self.rpc.get_signature_status(signature) => Some(result),
                _ = self.clock.sleep(remaining) => None,
            };
            let Some(polled) = polled else {
                warn!(
                    attempt = budget.attempts(),
                    "[gp-03] Status query outlived the confirmation budget"
                );
                break ConfirmationVerdict::Pending {
                    attempts: budget.attempts(),
                };
            };

            match polled {
                Ok(Some(status)) => {
                    if let Some(err) = status.err {
                        break ConfirmationVerdict::Failed { reason: err };
                    }
                    if status.is_confirmed() {
                        break ConfirmationVerdict::Confirmed {
                            attempts: budget.attempts(),
                        };
                    }
                    debug!(
                        attempt = budget.attempts(),
                        slot = status.slot,
                        "[gp-03] Not yet confirmed"
                    );
                }
                Ok(None) => debug!(attempt = budget.attempts(), "[gp-03] Signature not yet seen"),
                Err(e) => warn!(attempt = budget.attempts(), "[gp-03] Status query failed: {}", e),
            }

            match budget.next_backoff(self.clock.now()) {
                Some(backoff) => self.clock.sleep(backoff).await,
                None => {
                    break ConfirmationVerdict::Pending {
                        attempts: budget.attempts(),
                    }
                }
            }
        };

        CONFIRMATION_WAIT.observe(budget.elapsed(self.clock.now()).as_secs_f64());
        verdict
    }

    /// Informational re-check; never fails the payment.
    async fn validate_payment(&self, signature: &TxSignature) -> PaymentValidation {
        match self.rpc.get_transaction(signature).await {
            Ok(Some(tx)) => match tx.err {
                Some(err) => PaymentValidation::invalid(err),
                None => PaymentValidation::valid(tx.slot),
            },
            Ok(None) => PaymentValidation::invalid("Transaction not found"),
            Err(e) => {
                warn!("[gp-03] Validation error: {}", e);
                PaymentValidation::invalid(e.to_string())
            }
        }
    }
}

#[async_trait]
impl<R, C> PaymentEngineApi for PaymentEngine<R, C>
where
    R: SolanaRpc + ?Sized,
    C: Clock + ?Sized,
{
    async fn submit_payment(
        &self,
        wallet: Option<&dyn WalletCapability>,
        request: PaymentRequest,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        PAYMENT_ATTEMPTS.inc();

        match self.execute(wallet, &request).await {
            Ok(outcome) => {
                let status = if outcome.confirmed { "confirmed" } else { "pending" };
                PAYMENT_OUTCOMES.with_label_values(&[status]).inc();
                Ok(outcome)
            }
            Err(e) => {
                let classified = classify(&e.to_raw_failure());
                warn!(
                    code = e.code(),
                    kind = %classified.kind,
                    "[gp-03] Payment failed: {}",
                    e
                );
                PAYMENT_OUTCOMES.with_label_values(&["failed"]).inc();
                PAYMENT_FAILURES
                    .with_label_values(&[classified.kind.label()])
                    .inc();
                Err(classified)
            }
        }
    }
}

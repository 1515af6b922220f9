//! Payment Controller Service - sequences one attempt at a time

use crate::domain::{AttemptSnapshot, AttemptState, PurchaseIntent};
use crate::error::{ControllerError, ControllerResult};
use crate::ports::inbound::PaymentControllerApi;
use crate::ports::outbound::{PaymentEngineApi, PurchaseLedgerApi, WalletCapability};
use async_trait::async_trait;
use glow_telemetry::{OVERLAPPING_ATTEMPTS, PAYMENTS_IN_FLIGHT};
use gp_01_error_taxonomy::{log_error, ClassifiedError, ErrorContext};
use gp_02_purchase_ledger::{LedgerResult, PurchaseRecord};
use gp_03_payment_engine::TransactionOutcome;
use parking_lot::RwLock;
use shared_bus::{InMemoryEventBus, PipelineEvent};
use shared_types::ChainAddress;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Clears the in-flight flag when the attempt ends, however it ends.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        PAYMENTS_IN_FLIGHT.inc();
        Some(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        PAYMENTS_IN_FLIGHT.dec();
    }
}

/// Payment Controller Service implementation
pub struct PaymentController<E, L>
where
    E: PaymentEngineApi + ?Sized,
    L: PurchaseLedgerApi + ?Sized,
{
    engine: Arc<E>,
    ledger: Arc<L>,
    bus: Arc<InMemoryEventBus>,
    state: RwLock<AttemptState>,
    in_flight: AtomicBool,
}

impl<E, L> PaymentController<E, L>
where
    E: PaymentEngineApi + ?Sized,
    L: PurchaseLedgerApi + ?Sized,
{
    pub fn new(engine: Arc<E>, ledger: Arc<L>, bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            engine,
            ledger,
            bus,
            state: RwLock::new(AttemptState::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    fn on_settled(
        &self,
        intent: &PurchaseIntent,
        outcome: &TransactionOutcome,
        wallet: Option<&ChainAddress>,
    ) {
        if self.state.write().settle(outcome).is_none() {
            debug!("[gp-04] Attempt was reset before it settled");
        }

        match self.ledger.append(intent.to_record(outcome, wallet)) {
            Ok(history) => info!(
                signature = %outcome.signature,
                records = history.len(),
                "[gp-04] Purchase recorded"
            ),
            Err(e) => {
                error!(
                    signature = %outcome.signature,
                    "[gp-04] Payment succeeded but purchase was not recorded: {}",
                    e
                );
                self.state.write().warn_ledger(e.to_string());
            }
        }

        self.bus.publish_now(PipelineEvent::PaymentSettled {
            signature: outcome.signature.to_string(),
            confirmed: outcome.confirmed,
        });
    }

    fn on_failed(&self, intent: &PurchaseIntent, failure: &ClassifiedError) {
        log_error(
            &failure.to_raw(),
            ErrorContext::for_purchase(intent.product_id.clone(), intent.price_native),
        );
        if self.state.write().fail(failure.clone()).is_none() {
            debug!("[gp-04] Attempt was reset before it failed");
        }

        self.bus.publish_now(PipelineEvent::PaymentFailed {
            kind: failure.kind.label().to_string(),
            message: failure.message.clone(),
        });
    }
}

#[async_trait]
impl<E, L> PaymentControllerApi for PaymentController<E, L>
where
    E: PaymentEngineApi + ?Sized,
    L: PurchaseLedgerApi + ?Sized,
{
    async fn process_purchase(
        &self,
        wallet: Option<&dyn WalletCapability>,
        intent: PurchaseIntent,
    ) -> ControllerResult<TransactionOutcome> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            OVERLAPPING_ATTEMPTS.inc();
            warn!(
                product_id = %intent.product_id,
                "[gp-04] Purchase refused, another attempt is in flight"
            );
            return Err(ControllerError::AttemptInFlight);
        };

        self.state.write().begin();
        info!(
            product_id = %intent.product_id,
            amount = intent.price_native,
            "[gp-04] Purchase started"
        );

        let wallet_address = wallet.and_then(|w| w.public_key());
        let result = match intent.check() {
            Ok(()) => self.engine.submit_payment(wallet, intent.to_request()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                self.on_settled(&intent, &outcome, wallet_address.as_ref());
                Ok(outcome)
            }
            Err(failure) => {
                self.on_failed(&intent, &failure);
                Err(ControllerError::Payment(failure))
            }
        }
    }

    fn snapshot(&self) -> AttemptSnapshot {
        self.state.read().snapshot()
    }

    fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn reset(&self) {
        self.state.write().reset();
    }

    fn history(&self) -> LedgerResult<Vec<PurchaseRecord>> {
        self.ledger.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttemptPhase;
    use gp_01_error_taxonomy::ErrorKind;
    use gp_02_purchase_ledger::{
        InMemoryKVStore, PurchaseLedger, PurchaseStatus, StorageFault, UNKNOWN_WALLET,
    };
    use gp_03_payment_engine::{PaymentRequest, PaymentValidation, TransferTransaction, WalletError};
    use parking_lot::Mutex;
    use shared_bus::EventFilter;
    use shared_types::TxSignature;
    use std::collections::VecDeque;
    use tokio::sync::Notify;

    struct FakeEngine {
        results: Mutex<VecDeque<Result<TransactionOutcome, ClassifiedError>>>,
        requests: Mutex<Vec<PaymentRequest>>,
        /// When set, each call waits here before answering.
        gate: Option<Arc<Notify>>,
    }

    impl FakeEngine {
        fn answering(results: Vec<Result<TransactionOutcome, ClassifiedError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                requests: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().len()
        }
    }

    #[async_trait]
    impl PaymentEngineApi for FakeEngine {
        async fn submit_payment(
            &self,
            _wallet: Option<&dyn WalletCapability>,
            request: PaymentRequest,
        ) -> Result<TransactionOutcome, ClassifiedError> {
            self.requests.lock().push(request);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.results
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ClassifiedError::new(ErrorKind::Unknown, "no answer")))
        }
    }

    struct StaticWallet(ChainAddress);

    #[async_trait]
    impl WalletCapability for StaticWallet {
        fn public_key(&self) -> Option<ChainAddress> {
            Some(self.0)
        }

        async fn submit(&self, _tx: &TransferTransaction) -> Result<TxSignature, WalletError> {
            Err(WalletError::new("not used"))
        }
    }

    type Controller = PaymentController<FakeEngine, PurchaseLedger<InMemoryKVStore>>;

    fn sig(n: u8) -> TxSignature {
        TxSignature::new(bs58::encode([n; 64]).into_string())
    }

    fn confirmed(n: u8) -> TransactionOutcome {
        TransactionOutcome::confirmed(
            sig(n),
            format!("https://explorer.solana.com/tx/{}?cluster=devnet", sig(n)),
            PaymentValidation::valid(10),
        )
    }

    fn pending(n: u8) -> TransactionOutcome {
        TransactionOutcome::pending(sig(n), "https://explorer.solana.com/tx/p?cluster=devnet".into())
    }

    fn intent() -> PurchaseIntent {
        PurchaseIntent::new("serum-01", "Glow Serum", 0.05)
    }

    fn controller(engine: FakeEngine) -> (Controller, Arc<InMemoryKVStore>) {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = Arc::new(InMemoryKVStore::new());
        let ledger = Arc::new(PurchaseLedger::new(store.clone(), bus.clone()));
        (PaymentController::new(Arc::new(engine), ledger, bus), store)
    }

    #[tokio::test]
    async fn test_confirmed_purchase_is_recorded() {
        let (controller, _) = controller(FakeEngine::answering(vec![Ok(confirmed(1))]));
        let wallet = StaticWallet(ChainAddress::from_bytes([5u8; 32]));
        let mut events = controller.bus().subscribe(EventFilter::all());

        let outcome = controller
            .process_purchase(Some(&wallet), intent())
            .await
            .unwrap();
        assert!(outcome.confirmed);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, AttemptPhase::Confirmed);
        assert!(snapshot.success && !snapshot.loading);
        assert_eq!(snapshot.signature, Some(sig(1)));
        assert!(snapshot.ledger_warning.is_none());
        assert!(!controller.is_in_flight());

        let history = controller.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].signature, sig(1).as_str());
        assert_eq!(history[0].wallet_address, wallet.0.to_string());
        assert_eq!(history[0].status, PurchaseStatus::Confirmed);

        let mut saw_settled = false;
        while let Ok(Some(event)) = events.try_recv() {
            if let PipelineEvent::PaymentSettled { confirmed, .. } = event {
                saw_settled = confirmed;
            }
        }
        assert!(saw_settled);
    }

    #[tokio::test]
    async fn test_pending_purchase_is_recorded_as_pending() {
        let (controller, _) = controller(FakeEngine::answering(vec![Ok(pending(2))]));

        let outcome = controller.process_purchase(None, intent()).await.unwrap();
        assert!(outcome.pending);
        assert_eq!(controller.snapshot().phase, AttemptPhase::Pending);

        let history = controller.history().unwrap();
        assert_eq!(history[0].status, PurchaseStatus::Pending);
        assert_eq!(history[0].wallet_address, UNKNOWN_WALLET);
    }

    #[tokio::test]
    async fn test_failure_is_stored_and_not_retried() {
        let failure = ClassifiedError::new(ErrorKind::NetworkError, "Failed to get balance: down");
        let (controller, _) = controller(FakeEngine::answering(vec![Err(failure.clone())]));
        let mut events = controller.bus().subscribe(EventFilter::all());

        let err = controller.process_purchase(None, intent()).await.unwrap_err();
        assert_eq!(err, ControllerError::Payment(failure.clone()));
        assert_eq!(err.kind(), Some(ErrorKind::NetworkError));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, AttemptPhase::Failed);
        assert_eq!(snapshot.error, Some(failure));
        assert!(!snapshot.success);
        assert_eq!(controller.engine.calls(), 1);
        assert!(controller.history().unwrap().is_empty());

        assert_eq!(
            events.try_recv().unwrap(),
            Some(PipelineEvent::PaymentFailed {
                kind: "NetworkError".into(),
                message: "Failed to get balance: down".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_invalid_product_never_reaches_engine() {
        let (controller, _) = controller(FakeEngine::answering(vec![]));

        let err = controller
            .process_purchase(None, PurchaseIntent::new("", "", 0.05))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Unknown));
        assert_eq!(controller.engine.calls(), 0);
        assert_eq!(controller.snapshot().phase, AttemptPhase::Failed);
    }

    #[tokio::test]
    async fn test_ledger_failure_does_not_fail_purchase() {
        let (controller, store) = controller(FakeEngine::answering(vec![Ok(confirmed(3))]));
        controller.ledger.migrate().unwrap();
        store.inject_fault(StorageFault::Io {
            message: "disk gone".into(),
        });

        let outcome = controller.process_purchase(None, intent()).await.unwrap();
        assert!(outcome.confirmed);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, AttemptPhase::Confirmed);
        assert!(snapshot.ledger_warning.unwrap().contains("disk gone"));
        assert!(controller.history().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_attempt_clears_previous_error() {
        let (controller, _) = controller(FakeEngine::answering(vec![
            Err(ClassifiedError::new(ErrorKind::UserRejected, "Transaction was cancelled")),
            Ok(confirmed(4)),
        ]));

        controller.process_purchase(None, intent()).await.unwrap_err();
        assert!(controller.snapshot().error.is_some());

        controller.process_purchase(None, intent()).await.unwrap();
        let snapshot = controller.snapshot();
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.phase, AttemptPhase::Confirmed);
    }

    #[tokio::test]
    async fn test_overlapping_attempt_is_refused() {
        let gate = Arc::new(Notify::new());
        let mut engine = FakeEngine::answering(vec![Ok(confirmed(5))]);
        engine.gate = Some(gate.clone());
        let (controller, _) = controller(engine);

        let first = controller.process_purchase(None, intent());
        let second = async {
            assert!(controller.is_in_flight());
            assert_eq!(controller.snapshot().phase, AttemptPhase::Submitting);
            let refused = controller.process_purchase(None, intent()).await;
            gate.notify_one();
            refused
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first.unwrap().confirmed);
        assert_eq!(second.unwrap_err(), ControllerError::AttemptInFlight);
        assert_eq!(controller.engine.calls(), 1);
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let (controller, _) = controller(FakeEngine::answering(vec![Ok(confirmed(6))]));
        controller.process_purchase(None, intent()).await.unwrap();

        controller.reset();
        assert_eq!(controller.snapshot(), AttemptSnapshot::default());
        // History survives a reset
        assert_eq!(controller.history().unwrap().len(), 1);
    }
}

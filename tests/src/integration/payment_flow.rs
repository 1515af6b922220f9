//! # Payment Flow Integration
//!
//! Drives purchases through a fully wired [`PaymentRuntime`] with a scripted
//! node and wallet:
//!
//! ```text
//! Controller(4) ──→ Engine(3) ──→ ScriptedRpc / ScriptedWallet
//!      │
//!      └──settled──→ Ledger(2) ──PurchaseRecorded──→ Event Bus ──→ history view
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::{ScriptedRpc, ScriptedWallet};
    use gp_01_error_taxonomy::{ErrorAction, ErrorKind, Shortfall};
    use gp_02_purchase_ledger::{InMemoryKVStore, PurchaseLedgerApi, PurchaseStatus};
    use gp_04_payment_controller::{
        AttemptPhase, ControllerError, PaymentControllerApi, PurchaseIntent,
    };
    use gp_03_payment_engine::ManualClock;
    use payment_runtime::{PaymentRuntime, RuntimeConfig};
    use shared_bus::{EventFilter, EventTopic, PipelineEvent};
    use std::sync::Arc;
    use std::time::Duration;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Harness {
        runtime: PaymentRuntime,
        rpc: Arc<ScriptedRpc>,
        clock: Arc<ManualClock>,
    }

    fn harness(rpc: ScriptedRpc) -> Harness {
        let rpc = Arc::new(rpc);
        let clock = Arc::new(ManualClock::new());
        let runtime = PaymentRuntime::with_adapters(
            RuntimeConfig::default(),
            rpc.clone(),
            clock.clone(),
            Arc::new(InMemoryKVStore::new()),
        )
        .expect("default config is valid");
        Harness {
            runtime,
            rpc,
            clock,
        }
    }

    fn serum() -> PurchaseIntent {
        PurchaseIntent::new("serum-01", "Glow Serum", 0.05).with_brand("Lumi")
    }

    // =============================================================================
    // SETTLED PURCHASES
    // =============================================================================

    #[tokio::test]
    async fn test_confirmed_purchase_reaches_history() {
        let h = harness(ScriptedRpc::with_balance(1.0).confirming_after(2));
        let wallet = ScriptedWallet::new(9);
        let mut history_view = h.runtime.subscribe_history();
        let mut payments = h
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Payment]));

        let outcome = h
            .runtime
            .controller()
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap();

        assert!(outcome.confirmed);
        assert_eq!(outcome.signature, wallet.signature);
        assert_eq!(
            outcome.explorer_url,
            format!(
                "https://explorer.solana.com/tx/{}?cluster=devnet",
                wallet.signature
            )
        );
        assert_eq!(outcome.product.as_ref().map(|p| p.id.as_str()), Some("serum-01"));

        // Transfer went to the merchant for exactly the price
        let sent = wallet.submitted.lock().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].lamports, 50_000_000);
        assert_eq!(
            sent[0].to,
            h.runtime.config().payment.merchant().unwrap()
        );

        let history = h.runtime.controller().history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].signature, wallet.signature.as_str());
        assert_eq!(history[0].wallet_address, wallet.key.to_string());
        assert_eq!(history[0].status, PurchaseStatus::Confirmed);
        assert_eq!(history[0].explorer_url, outcome.explorer_url);

        assert!(history_view.drain_invalidations().unwrap());
        assert_eq!(
            payments.try_recv().unwrap(),
            Some(PipelineEvent::PaymentSettled {
                signature: wallet.signature.to_string(),
                confirmed: true,
            })
        );
        assert_eq!(h.clock.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_unconfirmed_purchase_is_pending_not_failed() {
        let h = harness(ScriptedRpc::with_balance(1.0));
        let wallet = ScriptedWallet::new(4);

        let outcome = h
            .runtime
            .controller()
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap();

        assert!(outcome.pending && !outcome.confirmed);
        assert_eq!(h.runtime.controller().snapshot().phase, AttemptPhase::Pending);
        assert!(h.clock.total_slept() <= Duration::from_secs(30));

        let history = h.runtime.ledger().read_all().unwrap();
        assert_eq!(history[0].status, PurchaseStatus::Pending);
    }

    #[tokio::test]
    async fn test_repeated_signature_is_recorded_once() {
        let h = harness(
            ScriptedRpc::with_balance(1.0)
                .confirming_after(1)
                .confirming_after(1),
        );
        // Same wallet, same scripted signature both times
        let wallet = ScriptedWallet::new(6);

        for _ in 0..2 {
            h.runtime
                .controller()
                .process_purchase(Some(&wallet), serum())
                .await
                .unwrap();
        }

        assert_eq!(wallet.submit_count(), 2);
        assert_eq!(h.runtime.ledger().read_all().unwrap().len(), 1);
    }

    // =============================================================================
    // FAILED PURCHASES
    // =============================================================================

    #[tokio::test]
    async fn test_insufficient_balance_stops_before_wallet() {
        let h = harness(ScriptedRpc::with_balance(0.01));
        let wallet = ScriptedWallet::new(2);

        let err = h
            .runtime
            .controller()
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap_err();

        let Some(ErrorKind::InsufficientBalance(Some(Shortfall {
            required,
            available,
        }))) = err.kind()
        else {
            panic!("expected a shortfall, got {err:?}");
        };
        assert!((required - 0.050005).abs() < 1e-9);
        assert!((available - 0.01).abs() < 1e-9);
        assert_eq!(wallet.submit_count(), 0);

        let snapshot = h.runtime.controller().snapshot();
        assert_eq!(snapshot.phase, AttemptPhase::Failed);
        assert_eq!(
            snapshot.error.unwrap().message,
            "Insufficient balance. You need 0.050005 SOL but only have 0.01 SOL"
        );
        assert!(h.runtime.ledger().read_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disconnected_wallet_makes_no_network_calls() {
        let h = harness(ScriptedRpc::with_balance(1.0));

        let err = h
            .runtime
            .controller()
            .process_purchase(None, serum())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::WalletNotConnected));
        assert_eq!(err.kind().map(|k| k.action()), Some(ErrorAction::ConnectWallet));
        assert_eq!(h.rpc.calls(), 0);
    }

    #[tokio::test]
    async fn test_user_rejection_is_not_a_network_error() {
        let h = harness(ScriptedRpc::with_balance(1.0));
        let wallet = ScriptedWallet::new(3).rejecting("User rejected the request.");
        let mut payments = h
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Payment]));

        let err = h
            .runtime
            .controller()
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Some(ErrorKind::UserRejected));
        assert!(!ErrorKind::UserRejected.is_retryable());
        assert!(matches!(
            payments.try_recv().unwrap(),
            Some(PipelineEvent::PaymentFailed { kind, .. }) if kind == "UserRejected"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_node_offers_retry() {
        let rpc = ScriptedRpc::with_balance(1.0);
        *rpc.unreachable.lock() = true;
        let h = harness(rpc);
        let wallet = ScriptedWallet::new(8);

        let err = h
            .runtime
            .controller()
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap_err();

        let ControllerError::Payment(failure) = err else {
            panic!("expected a payment failure");
        };
        assert_eq!(failure.kind, ErrorKind::NetworkError);
        assert!(failure.message.starts_with("Failed to get balance:"));
        assert!(failure.kind.is_retryable());
        assert_eq!(wallet.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_controller_recovers_after_failure() {
        let rpc = ScriptedRpc::with_balance(0.01).confirming_after(1);
        let h = harness(rpc);
        let wallet = ScriptedWallet::new(5);
        let controller = h.runtime.controller();

        controller
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap_err();
        assert!(!controller.is_in_flight());

        *h.rpc.balance.lock() = crate::fixtures::lamports(2.0);
        controller
            .process_purchase(Some(&wallet), serum())
            .await
            .unwrap();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, AttemptPhase::Confirmed);
        assert!(snapshot.error.is_none());

        controller.reset();
        assert_eq!(controller.snapshot().phase, AttemptPhase::Idle);
    }
}

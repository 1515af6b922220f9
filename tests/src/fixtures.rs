//! Scripted collaborators for end-to-end flows.
//!
//! `ScriptedRpc` answers like a node whose state the test controls;
//! `ScriptedWallet` signs nothing and hands back a fixed signature.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gp_02_purchase_ledger::PurchaseRecord;
use gp_03_payment_engine::{
    CommitmentLevel, ConfirmedTransaction, RpcError, SignatureStatus, SolanaRpc,
    TransferTransaction, WalletCapability, WalletError,
};
use parking_lot::Mutex;
use shared_types::{Blockhash, ChainAddress, Lamports, TxSignature, LAMPORTS_PER_SOL};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn address(n: u8) -> ChainAddress {
    ChainAddress::from_bytes([n; 32])
}

pub fn signature(n: u8) -> TxSignature {
    TxSignature::new(bs58::encode([n; 64]).into_string())
}

pub fn lamports(sol: f64) -> Lamports {
    (sol * LAMPORTS_PER_SOL as f64).round() as Lamports
}

/// 2024-05-01T10:00:00Z
const BASE_TIMESTAMP: i64 = 1_714_557_600;

/// A record with a deterministic id and signature; higher `n` is newer.
pub fn record(n: u32) -> PurchaseRecord {
    let mut record = PurchaseRecord::new_for_product(
        format!("product-{n}"),
        format!("Product {n}"),
        0.01,
        format!("sig-{n:04}"),
        format!("https://explorer.solana.com/tx/sig-{n:04}?cluster=devnet"),
    )
    .with_timestamp(
        DateTime::<Utc>::from_timestamp(BASE_TIMESTAMP + i64::from(n), 0).unwrap_or_default(),
    );
    record.id = format!("id-{n:04}");
    record
}

/// RPC node driven by the test.
pub struct ScriptedRpc {
    pub balance: Mutex<Lamports>,
    /// Status answers in order; `Ok(None)` once exhausted.
    pub statuses: Mutex<VecDeque<Option<SignatureStatus>>>,
    pub unreachable: Mutex<bool>,
    calls: AtomicUsize,
}

impl ScriptedRpc {
    pub fn with_balance(sol: f64) -> Self {
        Self {
            balance: Mutex::new(lamports(sol)),
            statuses: Mutex::new(VecDeque::new()),
            unreachable: Mutex::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Confirm on the `polls`-th status query.
    pub fn confirming_after(self, polls: usize) -> Self {
        {
            let mut statuses = self.statuses.lock();
            for _ in 1..polls {
                statuses.push_back(None);
            }
            statuses.push_back(Some(SignatureStatus {
                slot: 77,
                confirmation_status: Some(CommitmentLevel::Confirmed),
                err: None,
            }));
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.unreachable.lock() {
            return Err(RpcError::AllEndpointsFailed {
                attempted: 1,
                last: "connection refused".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SolanaRpc for ScriptedRpc {
    async fn get_balance(&self, _address: &ChainAddress) -> Result<Lamports, RpcError> {
        self.enter()?;
        Ok(*self.balance.lock())
    }

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError> {
        self.enter()?;
        Ok(Blockhash("GlowHash1111111111111111111111111111111111".into()))
    }

    async fn get_signature_status(
        &self,
        _signature: &TxSignature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        self.enter()?;
        Ok(self.statuses.lock().pop_front().flatten())
    }

    async fn get_transaction(
        &self,
        _signature: &TxSignature,
    ) -> Result<Option<ConfirmedTransaction>, RpcError> {
        self.enter()?;
        Ok(Some(ConfirmedTransaction { slot: 77, err: None }))
    }
}

/// Wallet returning a fixed signature, or a scripted rejection.
pub struct ScriptedWallet {
    pub key: ChainAddress,
    pub signature: TxSignature,
    pub rejection: Option<WalletError>,
    pub submitted: Mutex<Vec<TransferTransaction>>,
}

impl ScriptedWallet {
    pub fn new(n: u8) -> Self {
        Self {
            key: address(n),
            signature: signature(n),
            rejection: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(mut self, message: &str) -> Self {
        self.rejection = Some(WalletError::new(message));
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().len()
    }
}

#[async_trait]
impl WalletCapability for ScriptedWallet {
    fn public_key(&self) -> Option<ChainAddress> {
        Some(self.key)
    }

    async fn submit(&self, transaction: &TransferTransaction) -> Result<TxSignature, WalletError> {
        self.submitted.lock().push(transaction.clone());
        match &self.rejection {
            Some(e) => Err(e.clone()),
            None => Ok(self.signature.clone()),
        }
    }
}

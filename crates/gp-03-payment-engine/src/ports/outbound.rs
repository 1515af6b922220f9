//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the Payment Engine service: the user's wallet,
//! an RPC node and a clock.

use crate::domain::TransferTransaction;
use crate::error::{RpcError, WalletError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Blockhash, ChainAddress, Lamports, TxSignature};
use std::time::Duration;

/// A connected (or not) user wallet.
///
/// Key custody and signing live behind this trait.
#[async_trait]
pub trait WalletCapability: Send + Sync {
    /// Public address, `None` while disconnected.
    fn public_key(&self) -> Option<ChainAddress>;

    /// Whether [`WalletCapability::submit`] is available.
    fn supports_submit(&self) -> bool {
        true
    }

    /// Sign and submit `transaction`, returning its signature.
    async fn submit(&self, transaction: &TransferTransaction) -> Result<TxSignature, WalletError>;
}

/// Commitment reached by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentLevel {
    Processed,
    Confirmed,
    Finalized,
}

/// Status of a submitted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub slot: u64,
    pub confirmation_status: Option<CommitmentLevel>,
    /// Execution error, JSON-encoded as the node reported it.
    pub err: Option<String>,
}

impl SignatureStatus {
    /// Reached at least `confirmed` commitment.
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirmation_status,
            Some(CommitmentLevel::Confirmed | CommitmentLevel::Finalized)
        )
    }
}

/// A transaction fetched after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub slot: u64,
    /// Execution error, JSON-encoded.
    pub err: Option<String>,
}

/// Read access to an RPC node.
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Balance of `address` in lamports.
    async fn get_balance(&self, address: &ChainAddress) -> Result<Lamports, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError>;

    /// `Ok(None)` while the node has not seen the signature.
    async fn get_signature_status(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<SignatureStatus>, RpcError>;

    /// `Ok(None)` when the node cannot find the transaction.
    async fn get_transaction(
        &self,
        signature: &TxSignature,
    ) -> Result<Option<ConfirmedTransaction>, RpcError>;
}

/// Time source for the confirmation loop.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic reading from an arbitrary origin.
    fn now(&self) -> Duration;

    async fn sleep(&self, duration: Duration);
}

//! Error types for the Payment Engine subsystem
//!
//! [`PaymentError`] is internal vocabulary. At the engine boundary every
//! value is turned into a [`RawFailure`] and classified, so callers only
//! ever see a [`gp_01_error_taxonomy::ClassifiedError`].

use gp_01_error_taxonomy::RawFailure;
use thiserror::Error;

/// Payment engine errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    #[error("Wallet is not connected")]
    WalletNotConnected,

    #[error("Wallet does not support sending transactions")]
    WalletNotSupported,

    #[error("Invalid payment amount")]
    InvalidAmount { amount: f64 },

    /// Neither the requested nor the configured recipient is usable
    #[error("Invalid recipient wallet address configured")]
    InvalidRecipient,

    #[error("Insufficient balance. Required: {required} SOL, Available: {available} SOL")]
    InsufficientBalance { required: f64, available: f64 },

    #[error("Failed to get balance: {reason}")]
    BalanceUnavailable { reason: String },

    #[error("Failed to get recent blockhash: {reason}")]
    BlockhashUnavailable { reason: String },

    #[error("User rejected the transaction")]
    UserRejected,

    /// Wallet refused or failed to submit. `name` is the wallet's own error
    /// type name, if it reported one.
    #[error("Transaction send failed: {reason}")]
    SendFailed {
        name: Option<String>,
        reason: String,
    },

    /// The chain executed the transaction and reported an error
    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },
}

impl PaymentError {
    /// Stable code. Codes outside the taxonomy vocabulary are classified by
    /// message instead.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "WALLET_NOT_CONNECTED",
            Self::WalletNotSupported => "WALLET_NOT_SUPPORTED",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidRecipient => "CONFIGURATION_ERROR",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::BalanceUnavailable { .. }
            | Self::BlockhashUnavailable { .. }
            | Self::TransactionFailed { .. } => "NETWORK_ERROR",
            Self::UserRejected => "USER_REJECTED",
            Self::SendFailed { .. } => "SEND_FAILED",
        }
    }

    /// Error type name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "WalletNotConnectedError",
            Self::InsufficientBalance { .. } => "InsufficientBalanceError",
            Self::UserRejected => "UserRejectedError",
            Self::BalanceUnavailable { .. }
            | Self::BlockhashUnavailable { .. }
            | Self::TransactionFailed { .. } => "NetworkError",
            _ => "PaymentError",
        }
    }

    pub fn to_raw_failure(&self) -> RawFailure {
        let name = match self {
            Self::SendFailed {
                name: Some(name), ..
            } => name.clone(),
            _ => self.name().to_string(),
        };
        let raw = RawFailure {
            code: Some(self.code().to_string()),
            name: Some(name),
            message: Some(self.to_string()),
            shortfall: None,
        };
        match self {
            Self::InsufficientBalance {
                required,
                available,
            } => raw.with_shortfall(*required, *available),
            _ => raw,
        }
    }
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Failures talking to an RPC node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// Request never produced a usable HTTP response
    #[error("Network request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {message}")]
    InvalidResponse { message: String },

    #[error("All {attempted} RPC endpoints failed, last error: {last}")]
    AllEndpointsFailed { attempted: usize, last: String },
}

/// Failure reported by a wallet on submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WalletError {
    /// Error type name as the wallet reports it, if any.
    pub name: Option<String>,
    pub message: String,
}

impl WalletError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }

    /// Whether the holder declined or cancelled the signing prompt.
    pub fn is_user_cancellation(&self) -> bool {
        let text = self.message.to_lowercase();
        text.contains("user rejected")
            || text.contains("user cancel")
            || text.contains("user denied")
            || self
                .name
                .as_deref()
                .is_some_and(|n| n.contains("UserRejected"))
    }
}

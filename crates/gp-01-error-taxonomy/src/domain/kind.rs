//! The closed set of failure kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amounts behind an insufficient-balance failure, in native units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    /// Amount plus the baseline fee.
    pub required: f64,
    /// Balance observed when the check ran.
    pub available: f64,
}

/// Every failure the pipeline reports belongs to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No wallet, or a wallet without a public address.
    WalletNotConnected,
    /// Balance does not cover amount plus fee.
    InsufficientBalance(Option<Shortfall>),
    /// The wallet holder declined to sign.
    UserRejected,
    /// RPC transport failure or on-chain execution error.
    NetworkError,
    /// Confirmation took longer than the pipeline is willing to wait.
    ConfirmationTimeout,
    /// Non-positive or non-finite amount.
    InvalidAmount,
    /// Anything else.
    Unknown,
}

/// What a UI should offer next to the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorAction {
    ConnectWallet,
    GetFunds,
    Retry,
    Dismiss,
}

impl ErrorAction {
    /// Button label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ConnectWallet => "Connect Wallet",
            Self::GetFunds => "Get SOL",
            Self::Retry => "Retry",
            Self::Dismiss => "Dismiss",
        }
    }

    /// Primary actions get the prominent button style.
    pub const fn is_primary(&self) -> bool {
        matches!(self, Self::ConnectWallet | Self::Retry)
    }
}

impl ErrorKind {
    /// Stable label used in metrics and events.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "WalletNotConnected",
            Self::InsufficientBalance(_) => "InsufficientBalance",
            Self::UserRejected => "UserRejected",
            Self::NetworkError => "NetworkError",
            Self::ConfirmationTimeout => "ConfirmationTimeout",
            Self::InvalidAmount => "InvalidAmount",
            Self::Unknown => "Unknown",
        }
    }

    /// Wire code understood by [`crate::classify`].
    pub const fn code(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "WALLET_NOT_CONNECTED",
            Self::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            Self::UserRejected => "USER_REJECTED",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ConfirmationTimeout => "TRANSACTION_TIMEOUT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Resolve a wire code. `None` for codes outside the vocabulary,
    /// including `UNKNOWN_ERROR`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "WALLET_NOT_CONNECTED" => Some(Self::WalletNotConnected),
            "INSUFFICIENT_BALANCE" => Some(Self::InsufficientBalance(None)),
            "USER_REJECTED" => Some(Self::UserRejected),
            "NETWORK_ERROR" => Some(Self::NetworkError),
            "TRANSACTION_TIMEOUT" => Some(Self::ConfirmationTimeout),
            "INVALID_AMOUNT" => Some(Self::InvalidAmount),
            _ => None,
        }
    }

    /// User-facing message when the failure's own text is not shown.
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::WalletNotConnected => "Please connect your wallet to continue",
            Self::InsufficientBalance(_) => {
                "Insufficient balance. Please add more SOL to your wallet"
            }
            Self::UserRejected => "Transaction was cancelled",
            Self::NetworkError => "Network error. Please check your connection and try again",
            Self::ConfirmationTimeout => {
                "Transaction is taking longer than expected. Please check your wallet"
            }
            Self::InvalidAmount => "Invalid payment amount",
            Self::Unknown => "An unexpected error occurred. Please try again",
        }
    }

    pub const fn action(&self) -> ErrorAction {
        match self {
            Self::WalletNotConnected => ErrorAction::ConnectWallet,
            Self::InsufficientBalance(_) => ErrorAction::GetFunds,
            Self::NetworkError => ErrorAction::Retry,
            _ => ErrorAction::Dismiss,
        }
    }

    /// Only transport failures are worth retrying unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError)
    }

    /// Whether the failure should be surfaced prominently. A missing wallet
    /// or a user cancelling are expected flows.
    pub const fn needs_attention(&self) -> bool {
        !matches!(self, Self::WalletNotConnected | Self::UserRejected)
    }

    /// Same kind, ignoring any attached shortfall.
    pub fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

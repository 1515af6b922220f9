//! Raw and classified failures.

use super::kind::{ErrorKind, Shortfall};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failure as observed at a boundary, before classification.
///
/// Wallets, RPC nodes and the engine itself report failures with varying
/// amounts of structure; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFailure {
    /// Machine-readable code such as `NETWORK_ERROR`.
    pub code: Option<String>,
    /// Error type name such as `WalletSignTransactionError`.
    pub name: Option<String>,
    /// Human-readable text.
    pub message: Option<String>,
    /// Amounts for insufficient-balance failures.
    pub shortfall: Option<Shortfall>,
}

impl RawFailure {
    /// A bare message with no code or name.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A failure carrying a wire code.
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A failure carrying an error type name.
    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_shortfall(mut self, required: f64, available: f64) -> Self {
        self.shortfall = Some(Shortfall {
            required,
            available,
        });
        self
    }

    /// Message text, empty when absent.
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

impl From<&str> for RawFailure {
    fn from(message: &str) -> Self {
        Self::from_message(message)
    }
}

impl From<String> for RawFailure {
    fn from(message: String) -> Self {
        Self::from_message(message)
    }
}

/// A failure mapped onto the closed taxonomy. This is the only error shape
/// callers of the payment pipeline ever see.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Convert back to a coded raw failure. Classifying the result yields an
    /// equal value.
    pub fn to_raw(&self) -> RawFailure {
        let shortfall = match self.kind {
            ErrorKind::InsufficientBalance(shortfall) => shortfall,
            _ => None,
        };
        RawFailure {
            code: Some(self.kind.code().to_string()),
            name: None,
            message: Some(self.message.clone()),
            shortfall,
        }
    }
}

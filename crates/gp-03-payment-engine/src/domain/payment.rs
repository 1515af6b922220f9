//! Payment requests and outcomes.

use serde::{Deserialize, Serialize};
use shared_types::TxSignature;

/// Product being paid for. Logged with the attempt; never sent on chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// One payment to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// Explicit recipient. Falls back to the merchant when absent or invalid.
    pub recipient_address: Option<String>,
    /// Amount in native units. Must be finite and positive.
    pub amount_native: f64,
    pub memo: Option<ProductInfo>,
}

impl PaymentRequest {
    /// Pay the configured merchant.
    pub fn to_merchant(amount_native: f64) -> Self {
        Self {
            recipient_address: None,
            amount_native,
            memo: None,
        }
    }

    pub fn with_recipient(mut self, address: impl Into<String>) -> Self {
        self.recipient_address = Some(address.into());
        self
    }

    pub fn with_memo(mut self, product: ProductInfo) -> Self {
        self.memo = Some(product);
        self
    }
}

/// Informational re-check of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaymentValidation {
    pub fn valid(slot: u64) -> Self {
        Self {
            valid: true,
            slot: Some(slot),
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            slot: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a submitted payment.
///
/// Exactly one of `confirmed` and `pending` is set. Pending means the
/// transaction was submitted but confirmation was not observed in time; it
/// may still land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    pub signature: TxSignature,
    pub confirmed: bool,
    pub pending: bool,
    pub explorer_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<PaymentValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductInfo>,
}

impl TransactionOutcome {
    pub fn confirmed(
        signature: TxSignature,
        explorer_url: String,
        validation: PaymentValidation,
    ) -> Self {
        Self {
            signature,
            confirmed: true,
            pending: false,
            explorer_url,
            validation: Some(validation),
            product: None,
        }
    }

    pub fn pending(signature: TxSignature, explorer_url: String) -> Self {
        Self {
            signature,
            confirmed: false,
            pending: true,
            explorer_url,
            validation: None,
            product: None,
        }
    }

    pub fn with_product(mut self, product: Option<ProductInfo>) -> Self {
        self.product = product;
        self
    }
}

//! Purchase records and their schema checks.

use super::errors::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Wallet address stored when the paying wallet is not known.
pub const UNKNOWN_WALLET: &str = "unknown";

/// Settlement status at the time the record was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Confirmed,
    Pending,
}

impl PurchaseStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed payment.
///
/// Persisted with camelCase keys; the amount is stored under `price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "price")]
    pub price_native: f64,
    pub wallet_address: String,
    /// Unique across the ledger.
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    pub status: PurchaseStatus,
    pub explorer_url: String,
}

impl PurchaseRecord {
    /// Build a fresh record for a settled payment: random id, current time,
    /// unknown wallet, confirmed status.
    pub fn new_for_product(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        price_native: f64,
        signature: impl Into<String>,
        explorer_url: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            product_name: product_name.into(),
            price_native,
            wallet_address: UNKNOWN_WALLET.to_string(),
            signature: signature.into(),
            timestamp: Utc::now(),
            status: PurchaseStatus::Confirmed,
            explorer_url: explorer_url.into(),
        }
    }

    pub fn with_wallet_address(mut self, wallet_address: impl Into<String>) -> Self {
        self.wallet_address = wallet_address.into();
        self
    }

    pub fn with_status(mut self, status: PurchaseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check the invariants the type system does not already enforce.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("id", &self.id),
            ("productId", &self.product_id),
            ("productName", &self.product_name),
            ("walletAddress", &self.wallet_address),
            ("signature", &self.signature),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("Field '{field}' must not be empty"));
            }
        }

        if !self.price_native.is_finite() || self.price_native < 0.0 {
            errors.push("Field 'price' must be a non-negative number".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Validation { errors })
        }
    }
}

const STRING_FIELDS: [&str; 8] = [
    "id",
    "productId",
    "productName",
    "walletAddress",
    "signature",
    "timestamp",
    "status",
    "explorerUrl",
];

const NON_EMPTY_FIELDS: [&str; 4] = ["id", "productId", "productName", "signature"];

/// Validate a stored JSON value against the record schema.
///
/// Returns every problem found, not just the first.
pub fn validate_value(value: &Value) -> Result<(), Vec<String>> {
    let Some(object) = value.as_object() else {
        return Err(vec!["Purchase data must be an object".to_string()]);
    };

    let mut errors = Vec::new();

    for field in STRING_FIELDS {
        match object.get(field) {
            None => errors.push(format!("Missing required field: {field}")),
            Some(Value::String(_)) => {}
            Some(other) => errors.push(format!(
                "Field '{field}' must be of type string, got {}",
                json_type(other)
            )),
        }
    }

    for field in NON_EMPTY_FIELDS {
        if let Some(Value::String(s)) = object.get(field) {
            if s.trim().is_empty() {
                errors.push(format!("Field '{field}' must not be empty"));
            }
        }
    }

    match object.get("price") {
        None => errors.push("Missing required field: price".to_string()),
        Some(Value::Number(n)) => {
            if n.as_f64().map_or(true, |p| p < 0.0) {
                errors.push("Field 'price' must be a non-negative number".to_string());
            }
        }
        Some(other) => errors.push(format!(
            "Field 'price' must be of type number, got {}",
            json_type(other)
        )),
    }

    if let Some(Value::String(status)) = object.get("status") {
        if status != "confirmed" && status != "pending" {
            errors.push("Field 'status' must be \"confirmed\" or \"pending\"".to_string());
        }
    }

    if let Some(Value::String(ts)) = object.get("timestamp") {
        if DateTime::parse_from_rfc3339(ts).is_err() {
            errors.push("Field 'timestamp' must be a valid ISO date string".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

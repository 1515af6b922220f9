//! Structured error logging with call-site context.

use crate::classifier::classify;
use crate::domain::RawFailure;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Context attached to a logged failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Operation that failed, e.g. `process_purchase`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl ErrorContext {
    pub fn for_purchase(product_id: impl Into<String>, attempted_amount: f64) -> Self {
        Self {
            attempted_amount: Some(attempted_amount),
            product_id: Some(product_id.into()),
            operation: Some("process_purchase".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedError {
    /// Kind label.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// The raw text before classification, when it differs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    pub error: LoggedError,
    pub context: ErrorContext,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

/// Classify `failure`, emit an error event and return the entry for
/// forwarding to an error tracker.
pub fn log_error(failure: &RawFailure, context: ErrorContext) -> ErrorLogEntry {
    let classified = classify(failure);
    let original = failure
        .message
        .as_ref()
        .filter(|raw| **raw != classified.message)
        .cloned();

    let entry = ErrorLogEntry {
        error: LoggedError {
            kind: classified.kind.label().to_string(),
            message: classified.message,
            original,
        },
        context,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    error!(
        kind = %entry.error.kind,
        message = %entry.error.message,
        original = entry.error.original.as_deref().unwrap_or(""),
        product_id = entry.context.product_id.as_deref().unwrap_or(""),
        attempted_amount = entry.context.attempted_amount.unwrap_or_default(),
        "[gp-01] Error occurred"
    );

    entry
}

//! UI-facing rendering of a failure.

use crate::classifier::classify;
use crate::domain::{ErrorAction, RawFailure};
use serde::Serialize;

/// What an error banner needs to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPresentation {
    pub message: String,
    pub error_type: &'static str,
    pub action: ErrorAction,
    pub action_label: &'static str,
    pub primary: bool,
}

pub fn present(failure: &RawFailure) -> ErrorPresentation {
    let classified = classify(failure);
    let action = classified.kind.action();
    ErrorPresentation {
        message: classified.message,
        error_type: classified.kind.label(),
        action,
        action_label: action.label(),
        primary: action.is_primary(),
    }
}

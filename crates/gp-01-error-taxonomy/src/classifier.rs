//! Failure classification.

use crate::domain::{ClassifiedError, ErrorKind, RawFailure, Shortfall};

/// Map a raw failure onto the closed taxonomy. Total: every input yields a
/// value.
pub fn classify(failure: &RawFailure) -> ClassifiedError {
    let classified = by_code(failure)
        .or_else(|| by_name(failure))
        .or_else(|| by_keywords(failure))
        .unwrap_or_else(|| unknown(failure));

    attach_shortfall(classified, failure.shortfall)
}

/// Known codes keep the failure's own message.
fn by_code(failure: &RawFailure) -> Option<ClassifiedError> {
    let kind = ErrorKind::from_code(failure.code.as_deref()?)?;
    let message = match failure.message.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => kind.default_message().to_string(),
    };
    Some(ClassifiedError::new(kind, message))
}

fn by_name(failure: &RawFailure) -> Option<ClassifiedError> {
    let name = failure.name.as_deref()?;
    let kind = if name.contains("WalletNotConnected") {
        ErrorKind::WalletNotConnected
    } else if name.contains("InsufficientBalance") {
        ErrorKind::InsufficientBalance(None)
    } else if name.contains("UserRejected") || name.contains("TransactionRejected") {
        ErrorKind::UserRejected
    } else if name.contains("NetworkError") {
        ErrorKind::NetworkError
    } else if name.contains("Timeout") {
        ErrorKind::ConfirmationTimeout
    } else {
        return None;
    };
    Some(friendly(kind))
}

fn by_keywords(failure: &RawFailure) -> Option<ClassifiedError> {
    let text = failure.message_text().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let kind = if text.contains("wallet") && text.contains("connect") {
        ErrorKind::WalletNotConnected
    } else if text.contains("insufficient") || text.contains("balance") {
        ErrorKind::InsufficientBalance(None)
    } else if text.contains("reject") || text.contains("cancel") {
        ErrorKind::UserRejected
    } else if text.contains("network") || text.contains("fetch") {
        ErrorKind::NetworkError
    } else if text.contains("timeout") {
        ErrorKind::ConfirmationTimeout
    } else if text.contains("invalid") && text.contains("amount") {
        ErrorKind::InvalidAmount
    } else {
        // "not found" and everything else: keep the text as-is
        return None;
    };
    Some(friendly(kind))
}

fn unknown(failure: &RawFailure) -> ClassifiedError {
    let message = match failure.message.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => ErrorKind::Unknown.default_message().to_string(),
    };
    ClassifiedError::new(ErrorKind::Unknown, message)
}

fn friendly(kind: ErrorKind) -> ClassifiedError {
    ClassifiedError::new(kind, kind.default_message())
}

fn attach_shortfall(classified: ClassifiedError, shortfall: Option<Shortfall>) -> ClassifiedError {
    match (classified.kind, shortfall) {
        (ErrorKind::InsufficientBalance(_), Some(s)) => ClassifiedError::new(
            ErrorKind::InsufficientBalance(Some(s)),
            format!(
                "Insufficient balance. You need {} SOL but only have {} SOL",
                native_amount(s.required),
                native_amount(s.available)
            ),
        ),
        _ => classified,
    }
}

/// Lamport precision, trailing zeros dropped.
fn native_amount(value: f64) -> String {
    let fixed = format!("{value:.9}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

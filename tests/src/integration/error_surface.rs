//! # Error Surface Integration
//!
//! What a UI host sees when a purchase fails: the classified kind, the
//! banner it renders and the diagnostic entry it forwards.

#[cfg(test)]
mod tests {
    use gp_01_error_taxonomy::{
        classify, log_error, present, ErrorAction, ErrorContext, ErrorKind, RawFailure,
    };
    use gp_03_payment_engine::{PaymentError, WalletError};

    #[test]
    fn test_engine_failures_map_onto_closed_set() {
        let cases = [
            (PaymentError::WalletNotConnected, ErrorKind::WalletNotConnected),
            (
                PaymentError::InvalidAmount { amount: -1.0 },
                ErrorKind::InvalidAmount,
            ),
            (PaymentError::UserRejected, ErrorKind::UserRejected),
            (
                PaymentError::BlockhashUnavailable {
                    reason: "503".into(),
                },
                ErrorKind::NetworkError,
            ),
            (
                PaymentError::TransactionFailed {
                    reason: "{\"InstructionError\":[0,\"Custom\"]}".into(),
                },
                ErrorKind::NetworkError,
            ),
            (PaymentError::WalletNotSupported, ErrorKind::Unknown),
            (PaymentError::InvalidRecipient, ErrorKind::Unknown),
        ];

        for (error, expected) in cases {
            assert_eq!(classify(&error.to_raw_failure()).kind, expected, "{error}");
        }
    }

    #[test]
    fn test_shortfall_is_stated_verbatim() {
        let error = PaymentError::InsufficientBalance {
            required: 0.050005,
            available: 0.01,
        };
        let banner = present(&error.to_raw_failure());

        assert_eq!(banner.error_type, "InsufficientBalance");
        assert_eq!(
            banner.message,
            "Insufficient balance. You need 0.050005 SOL but only have 0.01 SOL"
        );
        assert_eq!(banner.action, ErrorAction::GetFunds);
    }

    #[test]
    fn test_wallet_messages_classify_by_text() {
        assert!(WalletError::new("User rejected the request.").is_user_cancellation());

        for message in [
            "User rejected the request.",
            "Transaction cancelled by user",
        ] {
            assert_eq!(
                classify(&RawFailure::from_message(message)).kind,
                ErrorKind::UserRejected
            );
        }

        let c = classify(&RawFailure::from_message("Signature not found"));
        assert_eq!(c.kind, ErrorKind::Unknown);
        assert_eq!(c.message, "Signature not found");
    }

    #[test]
    fn test_diagnostic_entry_keeps_original_text() {
        let raw = RawFailure::from_message("Failed to fetch");
        let entry = log_error(&raw, ErrorContext::for_purchase("serum-01", 0.05));

        assert_eq!(entry.error.kind, "NetworkError");
        assert_eq!(entry.error.original.as_deref(), Some("Failed to fetch"));
        assert_eq!(entry.context.attempted_amount, Some(0.05));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["error"]["type"], "NetworkError");
        assert_eq!(json["context"]["productId"], "serum-01");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}

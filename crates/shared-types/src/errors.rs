//! # Error Types
//!
//! Errors raised while parsing shared chain primitives.

use thiserror::Error;

/// Errors produced when text cannot be turned into a chain primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainTypeError {
    /// Address text was empty.
    #[error("Address is empty")]
    EmptyAddress,

    /// Text is not valid base58.
    #[error("Invalid base58: {reason}")]
    InvalidBase58 { reason: String },

    /// Decoded bytes have the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Cluster name is not recognised.
    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),
}

//! Error types for the Payment Controller subsystem

use gp_01_error_taxonomy::{ClassifiedError, ErrorKind};
use thiserror::Error;

/// Payment controller errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    /// Another attempt on this controller has not settled yet
    #[error("A payment is already in progress")]
    AttemptInFlight,

    #[error(transparent)]
    Payment(#[from] ClassifiedError),
}

impl ControllerError {
    /// Taxonomy kind of a payment failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::AttemptInFlight => None,
            Self::Payment(e) => Some(e.kind),
        }
    }
}

/// Result type for controller operations
pub type ControllerResult<T> = Result<T, ControllerError>;

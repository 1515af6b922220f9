//! Domain types for the error taxonomy.

pub mod failure;
pub mod kind;

pub use failure::{ClassifiedError, RawFailure};
pub use kind::{ErrorAction, ErrorKind, Shortfall};

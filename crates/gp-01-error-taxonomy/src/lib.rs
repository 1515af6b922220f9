//! # gp-01-error-taxonomy
//!
//! Maps every failure the payment pipeline can observe onto a small, closed
//! set of kinds the UI knows how to present.
//!
//! ## Overview
//!
//! - **Classifier**: raw failure (code, name, message) → [`ClassifiedError`]
//! - **Actions**: each kind carries the affordance a UI should offer
//! - **Diagnostics**: [`log_error`] emits a structured error event with context
//!
//! ## Classification Order
//!
//! ```text
//! explicit code ──miss──→ error name ──miss──→ message keywords ──miss──→ Unknown
//!      │                      │                      │                  (verbatim)
//!      └── own message        └── friendly message ──┘
//! ```
//!
//! A code outside the known vocabulary is treated as a miss, so the failure
//! still gets a chance at the name and keyword checks.
//!
//! ## Example
//!
//! ```rust
//! use gp_01_error_taxonomy::{classify, ErrorKind, RawFailure};
//!
//! let classified = classify(&RawFailure::from_message("User rejected the request"));
//! assert_eq!(classified.kind, ErrorKind::UserRejected);
//! assert_eq!(classified.message, "Transaction was cancelled");
//! ```

pub mod classifier;
pub mod diagnostics;
pub mod domain;
pub mod presentation;

pub use classifier::classify;
pub use diagnostics::{log_error, ErrorContext, ErrorLogEntry, LoggedError};
pub use domain::{ClassifiedError, ErrorAction, ErrorKind, RawFailure, Shortfall};
pub use presentation::{present, ErrorPresentation};

//! # Glow-Pay Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Scripted RPC node and wallet
//! └── integration/      # Cross-crate payment flows
//!     ├── payment_flow.rs
//!     ├── ledger_recovery.rs
//!     └── error_surface.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gp-tests
//! cargo test -p gp-tests integration::ledger_recovery
//!
//! # Benchmarks
//! cargo bench -p gp-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;

//! # Shared Types Crate
//!
//! Chain primitives and explorer link formatting shared by every subsystem of
//! the payment pipeline.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: address, signature and amount types are
//!   defined once here and reused by the engine, ledger and controller.
//! - **Parse, don't validate**: a `ChainAddress` value is always structurally
//!   valid; raw strings stay raw until parsed.

pub mod entities;
pub mod errors;
pub mod explorer;

pub use entities::*;
pub use errors::*;
pub use explorer::{available_explorers, Explorer, ExplorerInfo};

//! Adapters for the outbound ports.

pub mod clock;
pub mod rpc_client;

pub use clock::{ManualClock, TokioClock};
pub use rpc_client::JsonRpcSolanaClient;

//! Domain layer: the attempt state machine and purchase intents.

pub mod intent;
pub mod phase;

pub use intent::PurchaseIntent;
pub use phase::{AttemptEvent, AttemptPhase, AttemptSnapshot, AttemptState};

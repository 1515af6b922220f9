//! Fee estimation.

use shared_types::{lamports_to_sol, Lamports};

/// Baseline fee for a single-signature transfer.
pub const BASE_FEE_LAMPORTS: Lamports = 5_000;

/// Estimated fee in native units for sending `amount`.
///
/// A flat baseline; the amount does not influence it.
pub fn estimate_fee_native(_amount: f64) -> f64 {
    lamports_to_sol(BASE_FEE_LAMPORTS)
}

/// Balance needed to send `amount` including the fee.
pub fn required_balance_native(amount: f64) -> f64 {
    amount + estimate_fee_native(amount)
}

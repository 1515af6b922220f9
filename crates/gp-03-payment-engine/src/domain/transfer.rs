//! The single-instruction transfer handed to a wallet for signing.

use shared_types::{Blockhash, ChainAddress, Lamports};

/// Native transfer from the wallet to a recipient.
///
/// The wallet signs and submits it; the engine never holds keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    pub from: ChainAddress,
    pub to: ChainAddress,
    pub lamports: Lamports,
    pub recent_blockhash: Blockhash,
    /// Always the sender.
    pub fee_payer: ChainAddress,
}

impl TransferTransaction {
    pub fn new(
        from: ChainAddress,
        to: ChainAddress,
        lamports: Lamports,
        recent_blockhash: Blockhash,
    ) -> Self {
        Self {
            from,
            to,
            lamports,
            recent_blockhash,
            fee_payer: from,
        }
    }
}

//! # Explorer Links
//!
//! Formats transaction signatures and account addresses into human-facing
//! block explorer URLs. Pure string formatting, no network access.
//!
//! | Explorer | Transaction URL |
//! |----------|-----------------|
//! | Solana Explorer | `https://explorer.solana.com/tx/<sig>?cluster=<network>` |
//! | Solscan | `https://solscan.io/tx/<sig>` (`?cluster=devnet` on devnet only) |
//! | SolanaFM | `https://solana.fm/tx/<sig>?cluster=<network>-solana` |

use crate::entities::{is_well_formed_signature, Cluster};
use serde::{Deserialize, Serialize};

/// Supported block explorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Explorer {
    #[default]
    Solana,
    Solscan,
    SolanaFm,
}

/// Display metadata for an explorer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplorerInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub base_url: &'static str,
}

impl Explorer {
    /// All explorers, default first.
    pub const ALL: [Explorer; 3] = [Explorer::Solana, Explorer::Solscan, Explorer::SolanaFm];

    /// Resolve a stored preference key, falling back to the default explorer.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "solscan" => Self::Solscan,
            "solanafm" => Self::SolanaFm,
            _ => Self::Solana,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Solana => "solana",
            Self::Solscan => "solscan",
            Self::SolanaFm => "solanafm",
        }
    }

    #[must_use]
    pub const fn info(&self) -> ExplorerInfo {
        match self {
            Self::Solana => ExplorerInfo {
                key: "solana",
                name: "Solana Explorer",
                base_url: "https://explorer.solana.com",
            },
            Self::Solscan => ExplorerInfo {
                key: "solscan",
                name: "Solscan",
                base_url: "https://solscan.io",
            },
            Self::SolanaFm => ExplorerInfo {
                key: "solanafm",
                name: "SolanaFM",
                base_url: "https://solana.fm",
            },
        }
    }

    /// Transaction page for `signature` on `cluster`.
    ///
    /// Deterministic template; the signature is not inspected.
    #[must_use]
    pub fn tx_url(&self, signature: &str, cluster: Cluster) -> String {
        let base = self.info().base_url;
        match self {
            Self::Solana => format!("{base}/tx/{signature}?cluster={cluster}"),
            Self::Solscan if cluster == Cluster::Devnet => {
                format!("{base}/tx/{signature}?cluster=devnet")
            }
            Self::Solscan => format!("{base}/tx/{signature}"),
            Self::SolanaFm => format!("{base}/tx/{signature}?cluster={cluster}-solana"),
        }
    }

    /// Account page for `address` on `cluster`.
    #[must_use]
    pub fn account_url(&self, address: &str, cluster: Cluster) -> String {
        let base = self.info().base_url;
        match self {
            Self::Solana => format!("{base}/address/{address}?cluster={cluster}"),
            Self::Solscan if cluster == Cluster::Devnet => {
                format!("{base}/account/{address}?cluster=devnet")
            }
            Self::Solscan => format!("{base}/account/{address}"),
            Self::SolanaFm => format!("{base}/address/{address}?cluster={cluster}-solana"),
        }
    }

    /// Like [`Explorer::tx_url`], but `None` when the signature is malformed.
    #[must_use]
    pub fn checked_tx_url(&self, signature: &str, cluster: Cluster) -> Option<String> {
        if !is_well_formed_signature(signature) {
            tracing::warn!(signature, "Refusing explorer link for malformed signature");
            return None;
        }
        Some(self.tx_url(signature, cluster))
    }

    /// Account link, `None` for an empty address.
    #[must_use]
    pub fn checked_account_url(&self, address: &str, cluster: Cluster) -> Option<String> {
        if address.trim().is_empty() {
            return None;
        }
        Some(self.account_url(address, cluster))
    }
}

/// Transaction link on the default explorer.
#[must_use]
pub fn tx_url(signature: &str, cluster: Cluster) -> String {
    Explorer::default().tx_url(signature, cluster)
}

/// Metadata for every supported explorer.
#[must_use]
pub fn available_explorers() -> Vec<ExplorerInfo> {
    Explorer::ALL.iter().map(Explorer::info).collect()
}

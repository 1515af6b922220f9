//! # Core Chain Entities
//!
//! Primitive chain types shared by every subsystem of the payment pipeline.
//!
//! ## Clusters
//!
//! - **Identity**: `ChainAddress`, `TxSignature`, `Blockhash`
//! - **Value**: `Lamports`, SOL/lamport conversion
//! - **Network**: `Cluster`

use crate::errors::ChainTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Byte length of an Ed25519 public key (chain account address).
pub const ADDRESS_LEN: usize = 32;

/// Byte length of an Ed25519 transaction signature.
pub const SIGNATURE_LEN: usize = 64;

/// A structurally valid chain account address (base58, 32 bytes).
///
/// Construction only checks the encoding and the decoded length; whether the
/// key lies on the curve is the node's concern, not ours.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainAddress([u8; ADDRESS_LEN]);

impl ChainAddress {
    /// Wrap raw public key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw public key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Returns `true` if `candidate` parses as a chain address.
    #[must_use]
    pub fn is_valid(candidate: &str) -> bool {
        candidate.parse::<Self>().is_ok()
    }
}

impl FromStr for ChainAddress {
    type Err = ChainTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ChainTypeError::EmptyAddress);
        }
        let decoded = bs58::decode(trimmed)
            .into_vec()
            .map_err(|e| ChainTypeError::InvalidBase58 {
                reason: e.to_string(),
            })?;
        let bytes: [u8; ADDRESS_LEN] =
            decoded
                .try_into()
                .map_err(|raw: Vec<u8>| ChainTypeError::InvalidLength {
                    expected: ADDRESS_LEN,
                    actual: raw.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainAddress({self})")
    }
}

impl Serialize for ChainAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Opaque transaction identifier returned by the wallet on submission.
///
/// Kept as the wallet reported it. `is_well_formed` tells whether it looks
/// like a base58 Ed25519 signature, which explorer links rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(String);

impl TxSignature {
    /// Wrap a wallet-reported signature.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The signature text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base58 text of 87-88 characters decoding to 64 bytes.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        is_well_formed_signature(&self.0)
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxSignature {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TxSignature {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Check the textual shape of a transaction signature.
#[must_use]
pub fn is_well_formed_signature(candidate: &str) -> bool {
    if !(87..=88).contains(&candidate.len()) {
        return false;
    }
    matches!(
        bs58::decode(candidate).into_vec(),
        Ok(bytes) if bytes.len() == SIGNATURE_LEN
    )
}

/// Recent block reference that makes a transaction valid for a short window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blockhash(pub String);

impl fmt::Display for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: VALUE
// =============================================================================

/// Smallest indivisible unit of the native currency.
pub type Lamports = u64;

/// Lamports in one whole native token.
pub const LAMPORTS_PER_SOL: Lamports = 1_000_000_000;

/// Convert a decimal native amount to lamports, rounding to the nearest unit.
///
/// Returns `None` for negative, NaN, infinite, or overflowing amounts.
#[must_use]
pub fn sol_to_lamports(amount: f64) -> Option<Lamports> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let scaled = (amount * LAMPORTS_PER_SOL as f64).round();
    if scaled > u64::MAX as f64 {
        return None;
    }
    Some(scaled as Lamports)
}

/// Convert lamports to a decimal native amount.
#[must_use]
pub fn lamports_to_sol(lamports: Lamports) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

// =============================================================================
// CLUSTER C: NETWORK
// =============================================================================

/// Target network for RPC calls and explorer links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// Public development network (test tokens).
    #[default]
    Devnet,
    /// Public test network.
    Testnet,
    /// Production network.
    MainnetBeta,
}

impl Cluster {
    /// Identifier used in explorer query strings and configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
        }
    }

    /// Public RPC endpoint operated for this cluster.
    #[must_use]
    pub const fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cluster {
    type Err = ChainTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Self::MainnetBeta),
            other => Err(ChainTypeError::UnknownCluster(other.to_string())),
        }
    }
}

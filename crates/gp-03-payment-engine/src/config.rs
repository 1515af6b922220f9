//! Payment engine configuration.

use crate::domain::ConfirmationPolicy;
use shared_types::{ChainAddress, ChainTypeError, Cluster};
use std::env;
use std::time::Duration;

/// Fallback merchant for devnet testing.
pub const DEFAULT_MERCHANT_ADDRESS: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// Payment engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfig {
    /// Recipient used when a request names none (or an invalid one)
    pub merchant_address: String,
    /// Network for RPC defaults and explorer links
    pub cluster: Cluster,
    /// Primary RPC endpoint
    pub rpc_url: String,
    /// Tried in order when the primary is unreachable
    pub fallback_rpc_urls: Vec<String>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    pub confirmation: ConfirmationPolicy,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        let cluster = Cluster::default();
        Self {
            merchant_address: DEFAULT_MERCHANT_ADDRESS.to_string(),
            cluster,
            rpc_url: cluster.default_rpc_url().to_string(),
            fallback_rpc_urls: Vec::new(),
            request_timeout: Duration::from_secs(10),
            confirmation: ConfirmationPolicy::default(),
        }
    }
}

impl PaymentConfig {
    /// Load from environment variables.
    ///
    /// - `GLOW_MERCHANT_WALLET`: merchant address
    /// - `GLOW_CLUSTER`: devnet, testnet or mainnet-beta
    /// - `GLOW_RPC_URL`: primary endpoint (default: the cluster's public RPC)
    /// - `GLOW_RPC_FALLBACK_URLS`: comma-separated fallbacks
    pub fn from_env() -> Result<Self, ChainTypeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PaymentConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChainTypeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cluster = match lookup("GLOW_CLUSTER") {
            Some(raw) => raw.parse()?,
            None => defaults.cluster,
        };

        let fallback_rpc_urls = lookup("GLOW_RPC_FALLBACK_URLS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            merchant_address: lookup("GLOW_MERCHANT_WALLET")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.merchant_address),
            cluster,
            rpc_url: lookup("GLOW_RPC_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| cluster.default_rpc_url().to_string()),
            fallback_rpc_urls,
            ..defaults
        })
    }

    /// Parsed merchant address.
    pub fn merchant(&self) -> Result<ChainAddress, ChainTypeError> {
        self.merchant_address.parse()
    }

    /// Primary endpoint followed by fallbacks, without duplicates.
    pub fn rpc_endpoints(&self) -> Vec<String> {
        let mut endpoints = vec![self.rpc_url.clone()];
        for url in &self.fallback_rpc_urls {
            if !endpoints.contains(url) {
                endpoints.push(url.clone());
            }
        }
        endpoints
    }
}

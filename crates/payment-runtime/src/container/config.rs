//! # Runtime Configuration
//!
//! One configuration for every payment subsystem.
//!
//! ## Environment Variables
//!
//! | Variable | Consumer |
//! |----------|----------|
//! | `GLOW_MERCHANT_WALLET`, `GLOW_CLUSTER`, `GLOW_RPC_URL`, `GLOW_RPC_FALLBACK_URLS` | payment engine |
//! | `GLOW_LEDGER_PATH`, `GLOW_BUS_CAPACITY` | ledger |
//! | `GLOW_LOG_LEVEL`, `GLOW_JSON_LOGS`, `GLOW_SERVICE_NAME`, `GLOW_NETWORK` | telemetry |

use glow_telemetry::TelemetryConfig;
use gp_03_payment_engine::PaymentConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::ChainTypeError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub payment: PaymentConfig,
    pub ledger: LedgerConfig,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            payment: PaymentConfig::from_lookup(&lookup)?,
            ledger: LedgerConfig::from_lookup(&lookup)?,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        })
    }

    /// Reject configurations that cannot run a payment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.payment
            .merchant()
            .map_err(|source| ConfigError::InvalidMerchant {
                address: self.payment.merchant_address.clone(),
                source,
            })?;

        let has_endpoint = self
            .payment
            .rpc_endpoints()
            .iter()
            .any(|url| !url.trim().is_empty());
        if !has_endpoint {
            return Err(ConfigError::NoRpcEndpoint);
        }

        let confirmation = &self.payment.confirmation;
        if confirmation.max_attempts == 0 || confirmation.timeout == Duration::ZERO {
            return Err(ConfigError::EmptyConfirmationBudget);
        }

        if self.ledger.bus_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "GLOW_BUS_CAPACITY".into(),
                value: "0".into(),
            });
        }

        Ok(())
    }
}

/// Ledger storage and notification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// JSON file backing the ledger. In-memory when `None`.
    pub storage_path: Option<PathBuf>,
    /// Events buffered per subscriber.
    pub bus_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl LedgerConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bus_capacity = match lookup("GLOW_BUS_CAPACITY") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "GLOW_BUS_CAPACITY".into(),
                value: raw.clone(),
            })?,
            None => defaults.bus_capacity,
        };

        Ok(Self {
            storage_path: lookup("GLOW_LEDGER_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            bus_capacity,
        })
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid merchant address {address}: {source}")]
    InvalidMerchant {
        address: String,
        source: ChainTypeError,
    },

    #[error("No RPC endpoint configured")]
    NoRpcEndpoint,

    #[error("Confirmation budget must allow at least one poll")]
    EmptyConfirmationBudget,

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error(transparent)]
    Chain(#[from] ChainTypeError),
}

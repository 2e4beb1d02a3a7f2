//! Host configuration with TOML file support.

use serde::{Deserialize, Serialize};

use token_ledger::{GenesisConfig, DEFAULT_TOTAL_SUPPLY};
use token_types::{AccountId, TokenAmount};
use token_utils::LogFormat;

use crate::NodeError;

/// Configuration for a ledger host.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Total supply fixed at initialization.
    #[serde(default = "default_total_supply")]
    pub total_supply: u64,

    /// Account credited with the whole supply at initialization.
    /// Without one, every account starts at zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to dump Prometheus metrics when the host shuts down.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_total_supply() -> u64 {
    DEFAULT_TOTAL_SUPPLY
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Genesis parameters described by this configuration.
    pub fn genesis(&self) -> Result<GenesisConfig, NodeError> {
        let genesis = GenesisConfig::new(TokenAmount::new(self.total_supply));
        match &self.issuer {
            Some(raw) => {
                let issuer = AccountId::new(raw.as_str());
                issuer
                    .require_non_empty()
                    .map_err(|e| NodeError::Config(format!("issuer: {e}")))?;
                Ok(genesis.with_issuer(issuer))
            }
            None => Ok(genesis),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            total_supply: default_total_supply(),
            issuer: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}

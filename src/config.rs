//! Configuration loading and validation.
//!
//! Configuration is loaded from an optional TOML file with the wallet key
//! taken from the `WALLET_PRIVATE_KEY` environment variable. Contract
//! addresses, gas settings and the dispatch period are compiled in.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::OverlapPolicy;
use crate::domain::NetworkTarget;
use crate::error::{ConfigError, Result};

/// Environment variable holding the wallet's private key.
pub const PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Wallet configuration.
/// Private key is loaded from `WALLET_PRIVATE_KEY` env var at runtime (never from config file).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// RPC endpoint the wallet starts on. Defaults to the target network's.
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(skip)]
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl Config {
    /// Load from `path`, failing if the file is missing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            let mut config = Self::default();
            config.apply_env();
            Ok(config)
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.wallet.private_key = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    fn validate(&self) -> Result<()> {
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected \"pretty\" or \"json\", got {:?}", self.logging.format),
            }
            .into());
        }
        if let Err(e) = EnvFilter::try_new(&self.logging.level) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level",
                reason: e.to_string(),
            }
            .into());
        }
        if let Some(rpc_url) = &self.wallet.rpc_url {
            url::Url::parse(rpc_url).map_err(|e| ConfigError::InvalidValue {
                field: "wallet.rpc_url",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// The network the wallet must be on.
    #[must_use]
    pub fn target(&self) -> NetworkTarget {
        let target = NetworkTarget::bsc_mainnet();
        match &self.wallet.rpc_url {
            Some(url) => target.with_rpc_url(url.clone()),
            None => target,
        }
    }

    /// RPC endpoint the wallet starts on.
    #[must_use]
    pub fn rpc_url(&self) -> Option<String> {
        self.target().primary_rpc().map(str::to_string)
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

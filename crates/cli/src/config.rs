//! Layered configuration.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`GLASSPANE_*`, `__` separates sections)
//! 2. The TOML file (`--config`, else `./glasspane.toml` if present)
//! 3. Built-in defaults
//!
//! `GLASSPANE_SERVER__LISTEN_ADDR` maps to `server.listen_addr`,
//! `GLASSPANE_VAULT__KEY` to `vault.key`, and so on.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use server::ServerSettings;
use thiserror::Error;
use tracker::TrackerSettings;

/// File read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "glasspane.toml";

const ENV_PREFIX: &str = "GLASSPANE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A setting needed by the requested command is absent.
    #[error("Configuration value '{field}' is not set")]
    NotConfigured { field: &'static str },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlasspaneConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub tracker: TrackerSettings,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Where the record store is seeded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
}

/// Credential encryption key, base64-encoded 256-bit.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl VaultConfig {
    pub fn require_key(&self) -> Result<&str, ConfigError> {
        self.key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::NotConfigured { field: "vault.key" })
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("key", &self.key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// View password hashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// bcrypt cost factor for `hash-password`.
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: vault::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// OpenTelemetry export. Disabled unless an endpoint is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: "glasspane".to_string(),
        }
    }
}

impl GlasspaneConfig {
    /// Loads the configuration from all sources.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
        }
        Ok(Self::figment(path).extract()?)
    }

    /// Builds the provider chain.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

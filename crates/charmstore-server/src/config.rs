//! Configuration management for the charm store server.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use charmstore_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("config.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use charmstore_domain::{SeriesSet, DEFAULT_SERIES};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "CHARMSTORE";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Routing settings
    #[serde(default)]
    pub router: RouterSettings,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server network settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_body_limit() -> usize {
    1024 * 1024
}

/// Routing settings.
///
/// These settings can be overridden via environment variables with the
/// `CHARMSTORE_` prefix and `__` as the nested key separator:
///
/// - `CHARMSTORE_ROUTER__KNOWN_SERIES=bundle,trusty,xenial` - Replace the series set
/// - `CHARMSTORE_ROUTER__CONCURRENT_META_GROUPS=false` - Dispatch groups one at a time
///
/// # Example YAML Configuration
///
/// ```yaml
/// router:
///   known_series: [bundle, trusty, xenial]
///   concurrent_meta_groups: true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouterSettings {
    /// Series tokens recognised as the series element of an id path.
    #[serde(default = "default_known_series")]
    pub known_series: Vec<String>,

    /// Run independent metadata groups concurrently.
    #[serde(default = "default_true")]
    pub concurrent_meta_groups: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            known_series: default_known_series(),
            concurrent_meta_groups: true,
        }
    }
}

fn default_known_series() -> Vec<String> {
    DEFAULT_SERIES.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageSettings {
    /// Storage backend type. Only "memory" is available.
    #[serde(default = "default_storage_backend")]
    pub backend: String,

    /// JSON file of entities loaded into the memory backend at startup
    pub fixtures_path: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            fixtures_path: None,
        }
    }
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `CHARMSTORE_` and use `__` as
    /// separator. For example:
    /// - `CHARMSTORE_SERVER__PORT=9090` overrides `server.port`
    /// - `CHARMSTORE_STORAGE__FIXTURES_PATH=...` overrides `storage.fixtures_path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(environment())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    ///
    /// Uses default values and allows overrides via CHARMSTORE_ prefixed env vars.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(environment())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.server.port == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        let valid_backends = ["memory"];
        if !valid_backends.contains(&self.storage.backend.as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "storage.backend must be one of: {:?}, got: {}",
                    valid_backends, self.storage.backend
                ),
            });
        }

        if self
            .storage
            .fixtures_path
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "storage.fixtures_path must not be empty when set".to_string(),
            });
        }

        if self.router.known_series.is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "router.known_series must not be empty".to_string(),
            });
        }
        self.series_set()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Builds the series set used to split id paths.
    pub fn series_set(&self) -> Result<SeriesSet, ConfigLoadError> {
        SeriesSet::new(self.router.known_series.iter().cloned()).map_err(|e| {
            ConfigLoadError::Invalid {
                message: format!("router.known_series: {e}"),
            }
        })
    }
}

/// Environment source: CHARMSTORE_SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("router.known_series")
}

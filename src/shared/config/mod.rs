//! Application configuration module
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`<config_dir>/studyhub/sync.toml`), then `STUDYHUB_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Default interval between reachability probes
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 15;

/// Default path requested by the reachability probe
pub const DEFAULT_PROBE_PATH: &str = "/";

/// What a drain pass does with an item the server rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Stop the pass and keep the item queued
    #[default]
    Halt,
    /// Drop the item and continue with the next one
    Skip,
}

impl FromStr for RejectionPolicy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "halt" => Ok(Self::Halt),
            "skip" => Ok(Self::Skip),
            _ => Err(ConfigError::InvalidValue {
                key: "rejection_policy",
                value: value.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the study portal
    pub server_url: Option<String>,
    /// Location of the local offline database
    pub database_path: Option<PathBuf>,
    /// Session cookie sent with every remote call
    pub session_cookie: Option<String>,
    /// Seconds between reachability probes
    pub probe_interval_secs: u64,
    /// Path requested by the reachability probe
    pub probe_path: String,
    /// Per-request timeout; unset means wait for the transport to give up
    pub request_timeout_secs: Option<u64>,
    /// Handling of rejected items during a drain pass
    pub rejection_policy: RejectionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            database_path: None,
            session_cookie: None,
            probe_interval_secs: DEFAULT_PROBE_INTERVAL_SECS,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            request_timeout_secs: None,
            rejection_policy: RejectionPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.server_url {
            let parsed =
                reqwest::Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.probe_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "probe_interval_secs",
                value: "0".to_string(),
            });
        }
        if !self.probe_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "probe_path",
                value: self.probe_path.clone(),
            });
        }
        Ok(())
    }

    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Read a TOML file, returning `None` when it does not exist
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Platform config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("studyhub").join("sync.toml"))
    }

    /// Apply `STUDYHUB_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STUDYHUB_SERVER_URL") {
            self.server_url = Some(url);
        }
        if let Some(path) = lookup("STUDYHUB_DB_PATH") {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(cookie) = lookup("STUDYHUB_SESSION_COOKIE") {
            self.session_cookie = Some(cookie);
        }
        if let Some(value) = lookup("STUDYHUB_PROBE_INTERVAL_SECS") {
            self.probe_interval_secs = parse_secs("probe_interval_secs", &value)?;
        }
        if let Some(value) = lookup("STUDYHUB_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(parse_secs("request_timeout_secs", &value)?);
        }
        if let Some(value) = lookup("STUDYHUB_REJECTION_POLICY") {
            self.rejection_policy = value.parse()?;
        }
        Ok(self)
    }

    /// Defaults, then the config file, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let base = match Self::default_config_path() {
            Some(path) => Self::load_file(&path)?.unwrap_or_default(),
            None => Self::default(),
        };
        let config = base.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.config.server_url = Some(url.into());
        self
    }

    /// Set the local database path
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.database_path = Some(path.into());
        self
    }

    /// Set the session cookie
    pub fn session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.config.session_cookie = Some(cookie.into());
        self
    }

    /// Set the probe interval in seconds
    pub fn probe_interval_secs(mut self, secs: u64) -> Self {
        self.config.probe_interval_secs = secs;
        self
    }

    /// Set the probe path
    pub fn probe_path(mut self, path: impl Into<String>) -> Self {
        self.config.probe_path = path.into();
        self
    }

    /// Set the per-request timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Set the rejection policy
    pub fn rejection_policy(mut self, policy: RejectionPolicy) -> Self {
        self.config.rejection_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

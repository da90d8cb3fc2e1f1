use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, RejectionPolicy};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Client configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    /// Defaults, config file and `STUDYHUB_*` environment
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppConfig::load()?,
        })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url().trim_end_matches('/'), path)
    }

    /// URL of a per-topic endpoint, `{server}/topics/{topic_id}/{endpoint}`.
    ///
    /// The topic id is percent-encoded as a single path segment.
    pub fn topic_url(&self, topic_id: &str, endpoint: &str) -> Result<Url, ConfigError> {
        let server_url = self.server_url();
        let mut url =
            Url::parse(server_url).map_err(|_| ConfigError::InvalidUrl(server_url.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidUrl(server_url.to_string()))?
            .pop_if_empty()
            .extend(["topics", topic_id, endpoint]);
        Ok(url)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Session cookie attached to remote calls
    pub fn session_cookie(&self) -> Option<&str> {
        self.app.session_cookie.as_deref()
    }

    /// Local database file; defaults to `<data_dir>/studyhub/offline.db`
    pub fn database_path(&self) -> PathBuf {
        self.app.database_path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            path.push("studyhub");
            path.push("offline.db");
            path
        })
    }

    /// URL requested by the reachability probe
    pub fn probe_url(&self) -> String {
        self.api_url(&self.app.probe_path)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.app.probe_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.app.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn rejection_policy(&self) -> RejectionPolicy {
        self.app.rejection_policy
    }
}

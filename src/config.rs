//! Client configuration.
//!
//! Holds the two backend base URLs, the optional Host override for the REST
//! backend, transport timeouts and the token file location.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::default_token_path;

/// Default REST backend (Android emulator alias for the host machine).
pub const DEFAULT_API_URL: &str = "http://10.0.2.2:8000/api";

/// Default analytics / prediction service.
pub const DEFAULT_ANALYTICS_URL: &str = "http://10.0.2.2:8001";

/// Default connect and request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "PGE_API_URL";
pub const ENV_ANALYTICS_URL: &str = "PGE_ANALYTICS_URL";
pub const ENV_HOST_OVERRIDE: &str = "PGE_HOST_OVERRIDE";
pub const ENV_TIMEOUT_SECS: &str = "PGE_TIMEOUT_SECS";
pub const ENV_TOKEN_PATH: &str = "PGE_TOKEN_PATH";

/// Error type for configuration loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    /// A base URL was empty
    #[error("Base URL for {0} must not be empty")]
    EmptyUrl(String),
}

/// Configuration for the API clients.
///
/// # Example
///
/// ```ignore
/// use pge_client::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_base_url("http://localhost:8000/api")
///     .with_host_override("pge.local");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// REST backend base URL, without trailing slash
    pub api_base_url: String,
    /// Analytics service base URL, without trailing slash
    pub analytics_base_url: String,
    /// `Host` header sent to the REST backend only
    pub host_override: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Where the access token is persisted
    pub token_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            analytics_base_url: DEFAULT_ANALYTICS_URL.to_string(),
            host_override: None,
            connect_timeout: DEFAULT_TIMEOUT,
            request_timeout: DEFAULT_TIMEOUT,
            token_path: default_token_path()
                .unwrap_or_else(|| PathBuf::from(".pge").join("token.json")),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = trim_base(url.into());
        self
    }

    pub fn with_analytics_base_url(mut self, url: impl Into<String>) -> Self {
        self.analytics_base_url = trim_base(url.into());
        self
    }

    pub fn with_host_override(mut self, host: impl Into<String>) -> Self {
        self.host_override = Some(host.into());
        self
    }

    /// Set both the connect and the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.request_timeout = timeout;
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Build a config from the `PGE_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_api_base_url(url);
        }
        if let Some(url) = lookup(ENV_ANALYTICS_URL) {
            config = config.with_analytics_base_url(url);
        }
        if let Some(host) = lookup(ENV_HOST_OVERRIDE).filter(|h| !h.trim().is_empty()) {
            config = config.with_host_override(host.trim());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(path) = lookup(ENV_TOKEN_PATH).filter(|p| !p.is_empty()) {
            config = config.with_token_path(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that both base URLs are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.is_empty() {
            return Err(ConfigError::EmptyUrl("the REST backend".to_string()));
        }
        if self.analytics_base_url.is_empty() {
            return Err(ConfigError::EmptyUrl("the analytics service".to_string()));
        }
        Ok(())
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

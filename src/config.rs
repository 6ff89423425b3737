//! Client configuration
//!
//! Holds the settings the catalog client needs. The binary fills these from
//! command line flags with environment fallbacks; library users construct
//! them directly or take the defaults.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL of the public Anispace API
pub const DEFAULT_BASE_URL: &str = "https://anispace-api.vercel.app/api";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while building a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL could not be parsed
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },

    /// The base URL uses a scheme other than http or https
    #[error("Unsupported scheme '{0}' in base URL (expected http or https)")]
    UnsupportedScheme(String),
}

/// Settings for talking to the catalog API.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given base URL.
    ///
    /// The URL is validated and a trailing slash is removed so that route
    /// paths can be appended verbatim.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Returns the configuration with a different timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Validates a base URL and strips trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source: e,
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

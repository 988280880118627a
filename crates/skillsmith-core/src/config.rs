//! Service connection settings.

use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Transport timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "SKILLSMITH_API_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "SKILLSMITH_TIMEOUT_SECS";

/// Where and how to reach the skill service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// API root without trailing slash, e.g. `http://localhost:3001/api`
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Build a config for `base_url`, validating it.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `SKILLSMITH_API_URL` and `SKILLSMITH_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url)?,
            _ => Self::default(),
        };

        if let Ok(raw) = std::env::var(TIMEOUT_ENV)
            && !raw.trim().is_empty()
        {
            config.timeout = parse_timeout_secs(&raw)?;
        }

        Ok(config)
    }

    /// Absolute URL for an endpoint path such as `/skills/7`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Parse a positive number of seconds.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

//! CLI configuration file support
//!
//! Loads configuration from ~/.config/skillsmith/config.toml. Command line flags and
//! environment variables take precedence over the file, the file over built-in defaults.

use serde::{Deserialize, Serialize};
use skillsmith_core::{ConfigError, LibraryOptions, ServiceConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// Skill service settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the skill service
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Page size forwarded to skill listings
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Directory downloaded archives are saved in
    pub dir: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read config file");
                Self::default()
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("skillsmith").join("config.toml"))
    }

    /// Service settings after applying `--api-url` / `--timeout` over the file.
    pub fn service_config(
        &self,
        api_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<ServiceConfig, ConfigError> {
        let base_url = api_url
            .map(str::to_string)
            .or_else(|| self.api.base_url.clone());
        let mut config = match base_url {
            Some(url) => ServiceConfig::new(url)?,
            None => ServiceConfig::default(),
        };

        if let Some(secs) = timeout_secs.or(self.api.timeout_secs) {
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(secs.to_string()));
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Library settings; `out` overrides the configured download directory.
    pub fn library_options(&self, out: Option<PathBuf>) -> LibraryOptions {
        LibraryOptions {
            page_size: self.api.page_size,
            download_dir: out
                .or_else(|| self.download.dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

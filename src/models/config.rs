//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote directory client settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Fallback catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Remote availability gating
    #[serde(default)]
    pub availability: AvailabilityConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.remote.user_agent.trim().is_empty() {
            return Err(AppError::validation("remote.user_agent is empty"));
        }
        if self.remote.timeout_secs == 0 {
            return Err(AppError::validation("remote.timeout_secs must be > 0"));
        }
        if self.remote.probe_timeout_secs == 0 {
            return Err(AppError::validation(
                "remote.probe_timeout_secs must be > 0",
            ));
        }
        if self.remote.default_area_codes.is_empty() {
            return Err(AppError::validation("remote.default_area_codes is empty"));
        }
        if self.remote.keyword_param.trim().is_empty() {
            return Err(AppError::validation("remote.keyword_param is empty"));
        }
        url::Url::parse(&self.remote.base_url)
            .map_err(|e| AppError::validation(format!("remote.base_url is invalid: {e}")))?;
        if self.catalog.page_size == 0 {
            return Err(AppError::validation("catalog.page_size must be > 0"));
        }
        if self.availability.recheck_interval_secs == 0 {
            return Err(AppError::validation(
                "availability.recheck_interval_secs must be > 0",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings for the remote directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Search endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Search request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Shorter timeout for availability probes
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Country code issued when a search carries no remote filters
    #[serde(default = "defaults::default_country_code")]
    pub default_country_code: String,

    /// Area codes issued when a search carries no remote filters
    #[serde(default = "defaults::default_area_codes")]
    pub default_area_codes: Vec<String>,

    /// Query parameter carrying the free-text keyword
    #[serde(default = "defaults::keyword_param")]
    pub keyword_param: String,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            probe_timeout_secs: defaults::probe_timeout(),
            default_country_code: defaults::default_country_code(),
            default_area_codes: defaults::default_area_codes(),
            keyword_param: defaults::keyword_param(),
        }
    }
}

/// Fallback catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Records per fallback page
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
        }
    }
}

/// Remote availability gating settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Minimum time between probes once the remote is known to be down
    #[serde(default = "defaults::recheck_interval")]
    pub recheck_interval_secs: u64,
}

impl AvailabilityConfig {
    pub fn recheck_interval(&self) -> chrono::Duration {
        i64::try_from(self.recheck_interval_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            recheck_interval_secs: defaults::recheck_interval(),
        }
    }
}

mod defaults {
    // Remote defaults
    pub fn base_url() -> String {
        "https://www.volunteerconnector.org/api/search/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; CrisisConnect/1.0)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn probe_timeout() -> u64 {
        5
    }
    pub fn default_country_code() -> String {
        "64".into()
    }
    pub fn default_area_codes() -> Vec<String> {
        vec!["5".into(), "131".into(), "59".into()]
    }
    pub fn keyword_param() -> String {
        "q".into()
    }

    // Catalog defaults
    pub fn page_size() -> usize {
        6
    }

    // Availability defaults
    pub fn recheck_interval() -> u64 {
        5 * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.remote.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.remote.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn default_recheck_interval_is_five_minutes() {
        let config = Config::default();
        assert_eq!(
            config.availability.recheck_interval(),
            chrono::Duration::minutes(5)
        );
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[catalog]\npage_size = 4\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.catalog.page_size, 4);
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.remote.default_area_codes, vec!["5", "131", "59"]);
    }

    #[test]
    fn load_or_default_survives_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.catalog.page_size, 6);
    }
}

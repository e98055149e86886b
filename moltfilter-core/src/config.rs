//! Application configuration.
//!
//! Settings come from an optional TOML file, then `MOLTBOOK_API_KEY` and
//! `MOLTBOOK_BASE_URL` from the environment take precedence.

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const API_KEY_ENV: &str = "MOLTBOOK_API_KEY";
pub const BASE_URL_ENV: &str = "MOLTBOOK_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://www.moltbook.com/api/v1";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            max_attempts: 3,
        }
    }
}

/// Filter defaults. `None` pattern lists fall back to the built-in sets.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub min_karma: i64,
    pub filter_intros: bool,
    pub intro_patterns: Option<Vec<String>>,
    pub spam_domains: Option<Vec<String>>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_karma: crate::FilterOptions::DEFAULT_MIN_KARMA,
            filter_intros: true,
            intro_patterns: None,
            spam_domains: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        if config.api.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.max_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(config)
    }

    /// Overlay environment values. Empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                var_name: API_KEY_ENV.to_string(),
            })
    }
}

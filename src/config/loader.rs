use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::credentials::SecureString;
use crate::config::types::Config;

/// Environment variable that overrides `catalog.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `<config_dir>/filmshelf/config.toml`, falling back to the
    /// current directory if the platform has no config dir.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("filmshelf").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields `Config::default()`. The API key from
    /// `TMDB_API_KEY` wins over the file either way.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Config::default()
        };
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a specific file. Does not consult the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Overlay an API key taken from the environment. Empty values are ignored.
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.catalog.api_key = Some(SecureString::new(key.trim()));
        }
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The catalog base URL is an http(s) URL
    /// - The debounce window is non-zero
    /// - The favorites key is non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.catalog.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("catalog.base_url '{}' is not an http(s) URL", base),
            });
        }

        if self.search.debounce_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "search.debounce_ms must be greater than zero".to_string(),
            });
        }

        if self.favorites.key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "favorites.key must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

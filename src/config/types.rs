use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::credentials::SecureString;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

/// Connection settings for the movie catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API root, e.g. "https://api.themoviedb.org/3".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Prefix for poster paths.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// API key sent as the `api_key` query parameter.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecureString>,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u32,
}

/// Search-as-you-type behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last edit before a search is sent (default: 450).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Where favorites are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// Storage key holding the serialized set (default: "favs").
    #[serde(default = "default_favorites_key")]
    pub key: String,
    /// Directory for the file-backed store. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_request_timeout() -> u32 {
    30
}

fn default_debounce_ms() -> u64 {
    450
}

fn default_favorites_key() -> String {
    "favs".to_string()
}

impl CatalogConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_seconds))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds))
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl FavoritesConfig {
    /// Resolve the storage directory, falling back to `<data_dir>/filmshelf`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("filmshelf")
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            connect_timeout_seconds: default_connect_timeout(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            key: default_favorites_key(),
            data_dir: None,
        }
    }
}

mod credentials;
mod loader;
mod types;

pub use credentials::SecureString;
pub use loader::{ConfigError, API_KEY_ENV};
pub use types::{CatalogConfig, Config, FavoritesConfig, SearchConfig};

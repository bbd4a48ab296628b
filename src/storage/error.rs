use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A persisted value could not be interpreted.
    #[error("Stored value for '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },

    /// Keys become file names, so they are restricted to a safe alphabet.
    #[error("Invalid storage key '{key}'")]
    InvalidKey { key: String },

    #[error("Storage I/O failed at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to watch storage directory: {0}")]
    Watch(#[from] notify::Error),
}

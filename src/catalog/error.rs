use thiserror::Error;

use super::types::MovieId;

/// Failures reported by a [`MovieCatalog`](super::MovieCatalog).
///
/// Carries rendered messages instead of the underlying `reqwest` / `serde`
/// errors so it can live inside published, comparable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Transport failure: DNS, connect, TLS, timeout, truncated body.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The catalog answered with a payload we could not decode.
    #[error("Malformed catalog payload: {message}")]
    Parse { message: String },

    /// Single-movie lookup for an id the catalog does not know.
    #[error("Movie {id} not found")]
    NotFound { id: MovieId },

    /// Any other non-success HTTP status.
    #[error("Catalog returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

impl CatalogError {
    /// Short machine-readable tag, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Network { .. } => "network",
            CatalogError::Parse { .. } => "parse",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Upstream { .. } => "upstream",
        }
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        CatalogError::Network {
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(err: serde_json::Error) -> Self {
        CatalogError::Parse {
            message: err.to_string(),
        }
    }
}

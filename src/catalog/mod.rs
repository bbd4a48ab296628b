//! Movie catalog access.
//!
//! The catalog is an external REST service. [`MovieCatalog`] is the seam the
//! coordinators depend on; [`TmdbClient`] is the production implementation.

mod error;
mod tmdb;
mod types;

use async_trait::async_trait;

pub use error::CatalogError;
pub use tmdb::TmdbClient;
pub use types::{poster_url, Genre, MovieDetails, MovieId, MovieSummary};

/// Read-only operations against the movie catalog.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Currently popular movies, used when the query is empty.
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, CatalogError>;

    /// Movies matching a free-text query.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError>;

    /// Full details for a single movie.
    async fn fetch_by_id(&self, id: MovieId) -> Result<MovieDetails, CatalogError>;
}

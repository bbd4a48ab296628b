//! Single-movie lookup for the details view.

use crate::catalog::{CatalogError, MovieCatalog, MovieDetails, MovieId};
use crate::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailsState {
    #[default]
    Loading,
    Loaded(Box<MovieDetails>),
    /// The catalog has no such movie. Terminal, never retried.
    NotFound,
    Failed(CatalogError),
}

impl UiState for DetailsState {}

impl DetailsState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DetailsState::Loading)
    }
}

/// Fetch one movie and map the outcome to a display state.
pub async fn load_details(catalog: &dyn MovieCatalog, id: MovieId) -> DetailsState {
    match catalog.fetch_by_id(id).await {
        Ok(details) => DetailsState::Loaded(Box::new(details)),
        Err(CatalogError::NotFound { .. }) => {
            tracing::info!(movie_id = id, "Movie not found");
            DetailsState::NotFound
        }
        Err(err) => {
            tracing::warn!(movie_id = id, error = %err, "Failed to load movie details");
            DetailsState::Failed(err)
        }
    }
}

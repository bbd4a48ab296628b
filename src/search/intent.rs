use crate::catalog::{CatalogError, MovieSummary};
use crate::mvi::Intent;

use super::generation::Generation;
use super::state::SearchRequest;

#[derive(Debug, Clone)]
pub enum SearchIntent {
    /// The user changed the query text.
    QueryEdited { query: String },
    /// A request left for the catalog.
    Dispatched { request: SearchRequest },
    /// A request settled. Only sent for the current generation.
    Settled {
        generation: Generation,
        outcome: Result<Vec<MovieSummary>, CatalogError>,
    },
}

impl Intent for SearchIntent {}

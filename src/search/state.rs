use crate::catalog::{CatalogError, MovieSummary};
use crate::mvi::UiState;

use super::generation::Generation;

/// Which catalog operation a query maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Empty (after trimming) query: browse popular movies.
    Popular,
    Search,
}

impl RequestKind {
    pub fn for_query(query: &str) -> Self {
        if query.trim().is_empty() {
            RequestKind::Popular
        } else {
            RequestKind::Search
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Popular => "popular",
            RequestKind::Search => "search",
        }
    }
}

/// A dispatched request. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: Generation,
    pub query: String,
    pub kind: RequestKind,
}

impl SearchRequest {
    pub fn new(generation: Generation, query: impl Into<String>) -> Self {
        let query = query.into();
        let kind = RequestKind::for_query(&query);
        Self {
            generation,
            query,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Published search state. One per coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    /// Latest query typed or dispatched.
    pub query: String,
    /// Generation of the latest dispatch, 0 before the first one.
    pub generation: Generation,
    pub status: SearchStatus,
    /// Results of the latest applied response. Kept across failures.
    pub results: Vec<MovieSummary>,
    pub last_error: Option<CatalogError>,
}

impl UiState for SearchState {}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }
}

/// Where a coordinator is in its lifecycle.
///
/// `Debouncing` takes precedence over the request status: an edit made
/// while a request is in flight reports `Debouncing` until its timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Debouncing,
    InFlight,
    Ready,
    Failed,
    Disposed,
}

//! Shared test utilities: movie fixtures and a catalog whose responses
//! the test settles by hand, in any order.

#![allow(dead_code, unused_imports)]

pub mod mock_catalog;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use filmshelf::catalog::{CatalogError, MovieCatalog, MovieDetails, MovieId, MovieSummary};
use parking_lot::Mutex;
use tokio::sync::oneshot;

pub fn movie(id: MovieId, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        release_date: Some("2001-05-04".to_string()),
    }
}

/// Results for a query, one movie per character so tests can tell them apart.
pub fn results_for(query: &str) -> Vec<MovieSummary> {
    query
        .chars()
        .enumerate()
        .map(|(i, _)| movie(i as MovieId + 1, &format!("{} #{}", query, i + 1)))
        .collect()
}

/// Let spawned tasks run. Under paused time this also fires due timers.
pub async fn settle_tasks() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// A recorded catalog call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Popular,
    Search(String),
}

type Reply = Result<Vec<MovieSummary>, CatalogError>;

struct PendingCall {
    call: Call,
    reply: Option<oneshot::Sender<Reply>>,
}

/// Catalog that parks every list request until the test answers it.
#[derive(Clone, Default)]
pub struct ScriptedCatalog {
    calls: Arc<Mutex<Vec<PendingCall>>>,
    details: Arc<Mutex<VecDeque<Result<MovieDetails, CatalogError>>>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().iter().map(|p| p.call.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Answer call `index` (in dispatch order).
    pub fn reply(&self, index: usize, reply: Reply) {
        let sender = self.calls.lock()[index]
            .reply
            .take()
            .expect("call already answered");
        let _ = sender.send(reply);
    }

    pub fn succeed(&self, index: usize, movies: Vec<MovieSummary>) {
        self.reply(index, Ok(movies));
    }

    pub fn fail(&self, index: usize, err: CatalogError) {
        self.reply(index, Err(err));
    }

    pub fn push_details(&self, reply: Result<MovieDetails, CatalogError>) {
        self.details.lock().push_back(reply);
    }

    async fn park(&self, call: Call) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(PendingCall {
            call,
            reply: Some(tx),
        });
        rx.await.unwrap_or_else(|_| {
            Err(CatalogError::Network {
                message: "test dropped the call".to_string(),
            })
        })
    }
}

#[async_trait]
impl MovieCatalog for ScriptedCatalog {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>, CatalogError> {
        self.park(Call::Popular).await
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, CatalogError> {
        self.park(Call::Search(query.to_string())).await
    }

    async fn fetch_by_id(&self, id: MovieId) -> Result<MovieDetails, CatalogError> {
        self.details
            .lock()
            .pop_front()
            .unwrap_or(Err(CatalogError::NotFound { id }))
    }
}

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogError, MovieCatalog, MovieSummary};
use crate::config::SearchConfig;
use crate::mvi::Reducer;

use super::generation::{Generation, GenerationCounter};
use super::intent::SearchIntent;
use super::reducer::SearchReducer;
use super::state::{RequestKind, SearchPhase, SearchRequest, SearchState, SearchStatus};

/// Owns one search view's state, debounce timer and request bookkeeping.
///
/// All methods must be called from within a tokio runtime. Dropping the
/// coordinator disposes it.
pub struct SearchCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    catalog: Arc<dyn MovieCatalog>,
    debounce: Duration,
    generation: GenerationCounter,
    control: Mutex<Control>,
    state: watch::Sender<SearchState>,
}

#[derive(Default)]
struct Control {
    pending_query: String,
    timer: Option<DebounceTimer>,
    next_timer_token: u64,
    disposed: bool,
}

/// The single pending debounce timer. The token identifies it when it
/// fires, so a timer that woke up just as it was replaced cannot dispatch.
struct DebounceTimer {
    token: u64,
    handle: JoinHandle<()>,
}

impl Control {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.handle.abort();
        }
    }
}

impl SearchCoordinator {
    pub fn new(catalog: Arc<dyn MovieCatalog>, config: &SearchConfig) -> Self {
        Self::with_debounce(catalog, config.debounce())
    }

    pub fn with_debounce(catalog: Arc<dyn MovieCatalog>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(Inner {
                catalog,
                debounce,
                generation: GenerationCounter::new(),
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    /// Record a query edit and restart the debounce window.
    ///
    /// Only the last edit of a burst dispatches, once the query has been
    /// left alone for the whole window.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let mut control = self.inner.control.lock();
        if control.disposed {
            return;
        }

        control.cancel_timer();
        control.next_timer_token += 1;
        let token = control.next_timer_token;
        let weak = Arc::downgrade(&self.inner);
        let debounce = self.inner.debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire_timer(token);
            }
        });
        control.timer = Some(DebounceTimer { token, handle });
        control.pending_query = query.clone();

        tracing::trace!(query = %query, "Debounce restarted");
        self.inner.apply(SearchIntent::QueryEdited { query });
    }

    /// Dispatch the current query now, skipping any pending debounce.
    ///
    /// Identical consecutive submits each dispatch.
    pub fn submit(&self) {
        let mut control = self.inner.control.lock();
        if control.disposed {
            return;
        }
        control.cancel_timer();
        let query = control.pending_query.clone();
        Inner::dispatch(&self.inner, query);
    }

    /// Stop the coordinator. Pending timers are cancelled, in-flight
    /// responses will be ignored. Calling it again has no effect.
    pub fn dispose(&self) {
        let mut control = self.inner.control.lock();
        if control.disposed {
            return;
        }
        control.disposed = true;
        control.cancel_timer();
        tracing::debug!(
            generation = self.inner.generation.current(),
            "Search coordinator disposed"
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.control.lock().disposed
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Generation of the most recent dispatch.
    pub fn generation(&self) -> Generation {
        self.inner.generation.current()
    }

    pub fn pending_query(&self) -> String {
        self.inner.control.lock().pending_query.clone()
    }

    pub fn phase(&self) -> SearchPhase {
        let control = self.inner.control.lock();
        if control.disposed {
            return SearchPhase::Disposed;
        }
        if control.timer.is_some() {
            return SearchPhase::Debouncing;
        }
        match self.inner.state.borrow().status {
            SearchStatus::Idle => SearchPhase::Idle,
            SearchStatus::Loading => SearchPhase::InFlight,
            SearchStatus::Ready => SearchPhase::Ready,
            SearchStatus::Failed => SearchPhase::Failed,
        }
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Inner {
    fn fire_timer(self: &Arc<Self>, token: u64) {
        let mut control = self.control.lock();
        if control.disposed {
            return;
        }
        match &control.timer {
            Some(timer) if timer.token == token => {}
            _ => return,
        }
        // The firing task is this one; drop the handle without aborting.
        control.timer = None;
        let query = control.pending_query.clone();
        Self::dispatch(self, query);
    }

    /// Start a new generation and send its request.
    ///
    /// Called with the control lock held so dispose and settlement observe
    /// the generation change atomically.
    fn dispatch(this: &Arc<Self>, query: String) {
        let request = SearchRequest::new(this.generation.advance(), query);
        tracing::info!(
            generation = request.generation,
            kind = request.kind.as_str(),
            query = %request.query,
            "Dispatching catalog request"
        );
        this.apply(SearchIntent::Dispatched {
            request: request.clone(),
        });

        let catalog = Arc::clone(&this.catalog);
        let weak: Weak<Self> = Arc::downgrade(this);
        tokio::spawn(async move {
            let outcome = match request.kind {
                RequestKind::Popular => catalog.fetch_popular().await,
                RequestKind::Search => catalog.search(&request.query).await,
            };
            if let Some(inner) = weak.upgrade() {
                inner.settle(request.generation, outcome);
            }
        });
    }

    fn settle(&self, generation: Generation, outcome: Result<Vec<MovieSummary>, CatalogError>) {
        // Held while applying so a concurrent dispose cannot slip in between.
        let control = self.control.lock();
        if control.disposed {
            tracing::debug!(generation, "Discarding response after dispose");
            return;
        }
        if !self.generation.is_current(generation) {
            tracing::debug!(
                generation,
                current = self.generation.current(),
                "Discarding stale response"
            );
            return;
        }

        match &outcome {
            Ok(results) => {
                tracing::debug!(generation, count = results.len(), "Search results applied")
            }
            Err(err) => tracing::warn!(
                generation,
                kind = err.kind(),
                error = %err,
                "Catalog request failed"
            ),
        }
        self.apply(SearchIntent::Settled {
            generation,
            outcome,
        });
    }

    fn apply(&self, intent: SearchIntent) {
        self.state.send_if_modified(|state| {
            let next = SearchReducer::reduce(state.clone(), intent);
            if next == *state {
                return false;
            }
            *state = next;
            true
        });
    }
}

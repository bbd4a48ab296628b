//! Search-as-you-type coordination.
//!
//! [`SearchCoordinator`] debounces query edits, dispatches catalog requests
//! and publishes a single [`SearchState`]. Every dispatch is tagged with a
//! generation from [`GenerationCounter`]; a response is applied only if its
//! generation is still current when it settles. Superseded requests are
//! never aborted, their results are simply dropped.

mod coordinator;
mod generation;
mod intent;
mod reducer;
mod state;

pub use coordinator::SearchCoordinator;
pub use generation::{Generation, GenerationCounter};
pub use intent::SearchIntent;
pub use reducer::SearchReducer;
pub use state::{RequestKind, SearchPhase, SearchRequest, SearchState, SearchStatus};

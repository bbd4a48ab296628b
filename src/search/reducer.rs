use crate::mvi::Reducer;

use super::intent::SearchIntent;
use super::state::{SearchState, SearchStatus};

pub struct SearchReducer;

impl Reducer for SearchReducer {
    type State = SearchState;
    type Intent = SearchIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SearchIntent::QueryEdited { query } => SearchState { query, ..state },
            SearchIntent::Dispatched { request } => SearchState {
                query: request.query,
                generation: request.generation,
                status: SearchStatus::Loading,
                ..state
            },
            SearchIntent::Settled { generation, .. } if generation != state.generation => state,
            SearchIntent::Settled {
                outcome: Ok(results),
                ..
            } => SearchState {
                status: SearchStatus::Ready,
                results,
                last_error: None,
                ..state
            },
            // Keep the last good results on screen.
            SearchIntent::Settled {
                outcome: Err(err), ..
            } => SearchState {
                status: SearchStatus::Failed,
                last_error: Some(err),
                ..state
            },
        }
    }
}

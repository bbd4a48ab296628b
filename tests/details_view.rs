mod common;

use common::{movie, ScriptedCatalog};
use filmshelf::catalog::{CatalogError, MovieDetails};
use filmshelf::details::{load_details, DetailsState};

#[tokio::test]
async fn transport_failure_is_reported_not_hidden() {
    let catalog = ScriptedCatalog::new();
    let err = CatalogError::Network {
        message: "timed out".to_string(),
    };
    catalog.push_details(Err(err.clone()));

    let state = load_details(&catalog, 5).await;
    assert_eq!(state, DetailsState::Failed(err));
    assert!(state.is_terminal());
}

#[tokio::test]
async fn loaded_details_keep_summary_shape() {
    let catalog = ScriptedCatalog::new();
    let details = MovieDetails {
        summary: movie(5, "Five"),
        overview: "A fifth film.".to_string(),
        vote_average: 6.5,
        homepage: None,
        genres: vec![],
    };
    catalog.push_details(Ok(details.clone()));

    match load_details(&catalog, 5).await {
        DetailsState::Loaded(loaded) => assert_eq!(*loaded, details),
        other => panic!("expected loaded, got {:?}", other),
    }
}

#[test]
fn default_state_is_loading() {
    assert_eq!(DetailsState::default(), DetailsState::Loading);
    assert!(!DetailsState::default().is_terminal());
}

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{movie, results_for, settle_tasks, Call, ScriptedCatalog};
use filmshelf::catalog::CatalogError;
use filmshelf::config::SearchConfig;
use filmshelf::search::{SearchCoordinator, SearchPhase, SearchStatus};

const DEBOUNCE: Duration = Duration::from_millis(450);

fn coordinator() -> (SearchCoordinator, ScriptedCatalog) {
    let catalog = ScriptedCatalog::new();
    let coordinator = SearchCoordinator::new(Arc::new(catalog.clone()), &SearchConfig::default());
    (coordinator, catalog)
}

fn network_error() -> CatalogError {
    CatalogError::Network {
        message: "connection reset".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_dispatches_once_with_last_query() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("a");
    tokio::time::sleep(Duration::from_millis(100)).await;
    coordinator.set_query("ab");
    tokio::time::sleep(Duration::from_millis(100)).await;
    coordinator.set_query("abc");

    tokio::time::sleep(DEBOUNCE - Duration::from_millis(1)).await;
    assert_eq!(catalog.call_count(), 0);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(catalog.calls(), vec![Call::Search("abc".to_string())]);

    catalog.succeed(0, results_for("abc"));
    settle_tasks().await;

    let state = coordinator.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert_eq!(state.query, "abc");
    assert_eq!(state.results, results_for("abc"));
    assert_eq!(state.generation, 1);
}

#[tokio::test(start_paused = true)]
async fn edits_spaced_wider_than_window_each_dispatch() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("a");
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;
    coordinator.set_query("ab");
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(10)).await;

    assert_eq!(
        catalog.calls(),
        vec![Call::Search("a".to_string()), Call::Search("ab".to_string())]
    );
    assert_eq!(coordinator.generation(), 2);
}

#[tokio::test(start_paused = true)]
async fn late_popular_response_does_not_overwrite_search() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("");
    coordinator.submit();
    coordinator.set_query("batman");
    coordinator.submit();
    settle_tasks().await;

    assert_eq!(
        catalog.calls(),
        vec![Call::Popular, Call::Search("batman".to_string())]
    );

    catalog.succeed(1, results_for("batman"));
    settle_tasks().await;
    catalog.succeed(0, vec![movie(100, "Popular one")]);
    settle_tasks().await;

    let state = coordinator.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert_eq!(state.results, results_for("batman"));
    assert_eq!(state.generation, 2);
}

#[tokio::test(start_paused = true)]
async fn newest_generation_wins_for_every_settle_order() {
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let queries = ["x", "xy", "xyz"];

    for order in orders {
        let (coordinator, catalog) = coordinator();
        for query in queries {
            coordinator.set_query(query);
            coordinator.submit();
        }
        settle_tasks().await;

        for index in order {
            catalog.succeed(index, results_for(queries[index]));
            settle_tasks().await;
        }

        let state = coordinator.state();
        assert_eq!(state.results, results_for("xyz"), "order {:?}", order);
        assert_eq!(state.status, SearchStatus::Ready);
    }
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_previous_results() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("alien");
    coordinator.submit();
    settle_tasks().await;
    catalog.succeed(0, results_for("alien"));
    settle_tasks().await;

    coordinator.set_query("aliens");
    coordinator.submit();
    settle_tasks().await;
    catalog.fail(1, network_error());
    settle_tasks().await;

    let state = coordinator.state();
    assert_eq!(state.status, SearchStatus::Failed);
    assert_eq!(state.results, results_for("alien"));
    assert_eq!(state.last_error, Some(network_error()));
    assert_eq!(coordinator.phase(), SearchPhase::Failed);
}

#[tokio::test(start_paused = true)]
async fn stale_failure_is_not_surfaced() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("a");
    coordinator.submit();
    coordinator.set_query("b");
    coordinator.submit();
    settle_tasks().await;

    catalog.succeed(1, results_for("b"));
    settle_tasks().await;
    catalog.fail(0, network_error());
    settle_tasks().await;

    let state = coordinator.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert_eq!(state.last_error, None);
}

#[tokio::test(start_paused = true)]
async fn success_after_failure_clears_error() {
    let (coordinator, catalog) = coordinator();

    coordinator.submit();
    settle_tasks().await;
    catalog.fail(0, network_error());
    settle_tasks().await;
    assert_eq!(coordinator.state().status, SearchStatus::Failed);

    coordinator.submit();
    settle_tasks().await;
    catalog.succeed(1, vec![]);
    settle_tasks().await;

    let state = coordinator.state();
    assert_eq!(state.status, SearchStatus::Ready);
    assert!(state.results.is_empty());
    assert_eq!(state.last_error, None);
}

#[tokio::test(start_paused = true)]
async fn blank_query_browses_popular() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("   ");
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(1)).await;

    assert_eq!(catalog.calls(), vec![Call::Popular]);
}

#[tokio::test(start_paused = true)]
async fn clearing_query_after_search_returns_to_popular() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("batman");
    coordinator.submit();
    coordinator.set_query("");
    coordinator.submit();
    settle_tasks().await;

    assert_eq!(
        catalog.calls(),
        vec![Call::Search("batman".to_string()), Call::Popular]
    );
    assert_eq!(coordinator.state().query, "");
}

#[tokio::test(start_paused = true)]
async fn repeated_submit_of_same_query_dispatches_each_time() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("dune");
    coordinator.submit();
    coordinator.submit();
    coordinator.submit();
    settle_tasks().await;

    assert_eq!(catalog.call_count(), 3);
    assert_eq!(coordinator.generation(), 3);
}

#[tokio::test(start_paused = true)]
async fn submit_cancels_pending_debounce() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("heat");
    coordinator.submit();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(catalog.calls(), vec![Call::Search("heat".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn back_to_back_dispatches_stay_loading() {
    let (coordinator, _catalog) = coordinator();
    let mut updates = coordinator.subscribe();

    coordinator.submit();
    assert!(updates.borrow_and_update().is_loading());
    coordinator.submit();
    let state = updates.borrow_and_update().clone();
    assert!(state.is_loading());
    assert_eq!(state.generation, 2);
}

#[tokio::test(start_paused = true)]
async fn dispose_ignores_in_flight_response() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("up");
    coordinator.submit();
    settle_tasks().await;
    coordinator.dispose();

    catalog.succeed(0, results_for("up"));
    settle_tasks().await;

    let state = coordinator.state();
    assert_eq!(state.status, SearchStatus::Loading);
    assert!(state.results.is_empty());
    assert_eq!(coordinator.phase(), SearchPhase::Disposed);
}

#[tokio::test(start_paused = true)]
async fn dispose_cancels_pending_timer_and_later_calls() {
    let (coordinator, catalog) = coordinator();

    coordinator.set_query("up");
    coordinator.dispose();
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(catalog.call_count(), 0);

    coordinator.set_query("down");
    coordinator.submit();
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(catalog.call_count(), 0);

    coordinator.dispose();
    assert!(coordinator.is_disposed());
}

#[tokio::test(start_paused = true)]
async fn dropping_coordinator_discards_response() {
    let (coordinator, catalog) = coordinator();
    let updates = coordinator.subscribe();

    coordinator.submit();
    settle_tasks().await;
    drop(coordinator);

    catalog.succeed(0, results_for("gone"));
    settle_tasks().await;

    assert!(updates.borrow().results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn phase_follows_lifecycle() {
    let (coordinator, catalog) = coordinator();
    assert_eq!(coordinator.phase(), SearchPhase::Idle);

    coordinator.set_query("jaws");
    assert_eq!(coordinator.phase(), SearchPhase::Debouncing);
    assert_eq!(coordinator.pending_query(), "jaws");

    tokio::time::sleep(DEBOUNCE + Duration::from_millis(1)).await;
    assert_eq!(coordinator.phase(), SearchPhase::InFlight);

    coordinator.set_query("jaws 2");
    assert_eq!(coordinator.phase(), SearchPhase::Debouncing);

    tokio::time::sleep(DEBOUNCE + Duration::from_millis(1)).await;
    catalog.succeed(0, results_for("jaws"));
    catalog.succeed(1, results_for("jaws 2"));
    settle_tasks().await;
    assert_eq!(coordinator.phase(), SearchPhase::Ready);
    assert_eq!(coordinator.state().results, results_for("jaws 2"));
}

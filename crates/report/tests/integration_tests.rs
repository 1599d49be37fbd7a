//! Integration tests for the report crate
//!
//! These tests drive the sync controller against the in-memory backend and
//! feed its output through the tree renderer.

use report::{
    BackendCall, BackendError, ExpansionState, InMemoryBackend, JsonPath, RESULTS_FAILURE_SENTINEL,
    RefreshApplied, RenderOptions, ReportBackend, SUBMIT_FAILURE_MESSAGE, SearchRequest,
    SyncController, run_submission,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Helper to create a mounted controller over a fresh fake backend
fn mounted_controller(backend: &Arc<InMemoryBackend>) -> SyncController {
    let mut controller = SyncController::new(backend.clone());
    let ticket = controller.mount();
    let result = backend.fetch_results();
    controller.apply_refresh(ticket, result);
    controller
}

fn sample_results() -> Value {
    json!({
        "query": "weather",
        "location": "NYC",
        "reports": [
            {"source": "tool1", "summary": "Rain expected", "score": 0.82},
            {"source": "tool2", "summary": null, "score": 0.4}
        ]
    })
}

#[test]
fn test_submit_all_stages_succeed() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut controller = mounted_controller(&backend);
    backend.set_search_reply(Ok("Search completed for weather in NYC".to_string()));
    backend.set_results(Ok(sample_results()));

    controller.submit("weather", "NYC");

    let state = controller.state();
    assert_eq!(
        state.search_result_message.as_deref(),
        Some("Search completed for weather in NYC")
    );
    assert_eq!(state.processed_data, Some(sample_results()));
    assert!(state.error.is_none());
    assert_eq!(
        state.last_submitted,
        Some(SearchRequest::new("weather", "NYC"))
    );

    let request = SearchRequest::new("weather", "NYC");
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::FetchResults,
            BackendCall::Search(request.clone()),
            BackendCall::Process(request),
            BackendCall::FetchResults,
        ]
    );
}

#[test]
fn test_raw_text_round_trips_to_processed_data() {
    let backend = Arc::new(InMemoryBackend::with_results(sample_results()));
    let mut controller = mounted_controller(&backend);
    controller.refresh_results();

    let state = controller.state();
    let reparsed: Value = serde_json::from_str(&state.raw_json_text).unwrap();
    assert_eq!(Some(reparsed), state.processed_data);
    assert!(state.raw_json_text.contains("\n  \"query\": \"weather\""));
}

#[test]
fn test_search_failure_stops_pipeline() {
    let backend = Arc::new(InMemoryBackend::with_results(sample_results()));
    let mut controller = mounted_controller(&backend);
    backend.set_search_reply(Err(BackendError::Transport("connection refused".to_string())));

    controller.submit("weather", "NYC");

    assert_eq!(controller.state().error.as_deref(), Some(SUBMIT_FAILURE_MESSAGE));
    assert!(controller.state().search_result_message.is_none());
    assert_eq!(
        backend.count_calls(|c| matches!(c, BackendCall::Process(_))),
        0
    );
    // Only the fetch from mounting
    assert_eq!(backend.results_fetches(), 1);
    // Prior results are untouched
    assert_eq!(controller.state().processed_data, Some(sample_results()));
}

#[test]
fn test_empty_strings_are_forwarded() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut controller = mounted_controller(&backend);

    controller.submit("", "");

    assert!(backend.calls().contains(&BackendCall::Search(SearchRequest::default())));
    assert!(backend.calls().contains(&BackendCall::Process(SearchRequest::default())));
}

#[test]
fn test_timeout_keeps_last_known_good() {
    let backend = Arc::new(InMemoryBackend::with_results(sample_results()));
    let mut controller = mounted_controller(&backend);

    backend.set_results(Err(BackendError::Timeout { after_ms: 5000 }));
    controller.refresh_results();

    let state = controller.state();
    assert_eq!(state.raw_json_text, RESULTS_FAILURE_SENTINEL);
    assert!(state.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(state.processed_data, Some(sample_results()));

    // Recovery clears the error and restores the text form
    backend.set_results(Ok(json!({"done": true})));
    controller.refresh_results();
    assert!(controller.state().error.is_none());
    assert_eq!(controller.state().raw_json_text, "{\n  \"done\": true\n}");
}

#[test]
fn test_timeout_without_prior_success() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.set_results(Err(BackendError::Timeout { after_ms: 5000 }));
    let controller = mounted_controller(&backend);

    let state = controller.state();
    assert!(state.processed_data.is_none());
    assert_eq!(state.raw_json_text, RESULTS_FAILURE_SENTINEL);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to fetch results. Error: Request timed out after 5000 ms")
    );
}

#[test]
fn test_repeated_failures_never_clear_results() {
    let backend = Arc::new(InMemoryBackend::with_results(sample_results()));
    let mut controller = mounted_controller(&backend);

    for code in [500u16, 502, 404] {
        backend.push_results(Err(BackendError::Status { code, detail: None }));
        controller.refresh_results();
        assert_eq!(controller.state().processed_data, Some(sample_results()));
    }
}

#[test]
fn test_overlapping_polls_last_requested_wins() {
    let backend = Arc::new(InMemoryBackend::new());
    let mut controller = mounted_controller(&backend);

    // Tick, then the post-submit refresh, both in flight
    let tick = controller.begin_refresh();
    let after_submit = controller.begin_refresh();

    // The newer request resolves first; the slow tick arrives later
    assert_eq!(
        controller.apply_refresh(after_submit, Ok(json!({"phase": "processed"}))),
        RefreshApplied::Applied
    );
    assert_eq!(
        controller.apply_refresh(tick, Ok(json!({"phase": "pending"}))),
        RefreshApplied::Stale
    );

    assert_eq!(
        controller.state().processed_data,
        Some(json!({"phase": "processed"}))
    );
}

#[test]
fn test_split_submission_matches_blocking_submit() {
    let backend = Arc::new(InMemoryBackend::with_results(sample_results()));
    let mut controller = mounted_controller(&backend);

    let request = controller.begin_submit("weather", "NYC");
    assert!(controller.state().submitting);

    let outcome = run_submission(backend.as_ref(), &request);
    let should_refresh = controller.apply_submission(outcome);

    assert!(should_refresh);
    assert!(!controller.state().submitting);
    assert_eq!(
        controller.state().search_result_message.as_deref(),
        Some("Search request received")
    );
}

#[test]
fn test_polled_results_render_as_tree() {
    let backend = Arc::new(InMemoryBackend::with_results(sample_results()));
    let controller = mounted_controller(&backend);

    let mut expansion = ExpansionState::new();
    let options = RenderOptions::default();
    let text = &controller.state().raw_json_text;

    let view = report::render(text, &expansion, &options);
    let keys: Vec<&str> = view.rows().iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["query", "location", "reports"]);

    expansion.toggle(&JsonPath::from_keys(["reports"]));
    expansion.toggle(&JsonPath::root().key("reports").index(1));
    let view = report::render(text, &expansion, &options);

    let summary = view
        .row(&JsonPath::root().key("reports").index(1).key("summary"))
        .unwrap();
    assert_eq!(summary.label(), "summary: null");
    assert_eq!(summary.depth, 2);
    assert!(
        view.row(&JsonPath::root().key("reports").index(0).key("summary"))
            .is_none()
    );
}

#[test]
fn test_failure_sentinel_renders_as_error_view() {
    let backend = Arc::new(InMemoryBackend::new());
    let controller = mounted_controller(&backend);

    let view = report::render(
        &controller.state().raw_json_text,
        &ExpansionState::new(),
        &RenderOptions::default(),
    );
    assert!(view.is_error());
}

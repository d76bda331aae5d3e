//! Run lifecycle tests: state machine, single-flight guard, failure
//! semantics, and the HTTP backend.

mod common;
use common::*;

use httpmock::prelude::*;
use pipewright::config::ClientConfig;
use pipewright::runner::{HttpBackend, RunController, RunEvent, RunOutcome, RunState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn successful_run_replaces_results_wholesale() {
    let backend = Arc::new(MockBackend::new().succeed_with(preview_response()));
    let controller = RunController::new(backend.clone());
    let graph = seeded_graph();

    let outcome = controller.run(&graph).await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(controller.state(), RunState::Idle);

    // The store exposes the service's map verbatim.
    let results = controller.results();
    assert_eq!(results.status(), Some("ok"));
    assert_eq!(results.len(), 1);
    let n1 = results.get("n1").expect("n1 result present");
    assert_eq!(n1.node_type.as_deref(), Some("data_source"));
    let preview = n1.preview.as_ref().expect("preview present");
    assert_eq!(preview.columns, ["date", "temp"]);
    assert_eq!(preview.rows, 100);
    assert!(controller.has_result("n1"));
    assert!(!controller.has_result("n2"));
}

#[tokio::test]
async fn run_sends_the_full_request() {
    let backend = Arc::new(MockBackend::new());
    let controller = RunController::new(backend.clone());
    let graph = seeded_graph();

    controller.run(&graph).await;

    let request = backend.take_last_request().expect("backend was invoked");
    assert_eq!(request.nodes.len(), 4);
    assert_eq!(request.edges.len(), 3);
    assert!(request.target_node.is_none());
}

#[tokio::test]
async fn run_node_scopes_to_the_target() {
    let backend = Arc::new(MockBackend::new());
    let controller = RunController::new(backend.clone());
    let graph = seeded_graph();

    let outcome = controller.run_node(&graph, "n3").await;

    assert_eq!(outcome, RunOutcome::Completed);
    let request = backend.take_last_request().expect("backend was invoked");
    assert_eq!(request.target_node.as_deref(), Some("n3"));
    // Upstream closure stays server-side: the whole graph still travels.
    assert_eq!(request.nodes.len(), 4);
    assert_eq!(request.edges.len(), 3);
}

#[tokio::test]
async fn failed_run_leaves_results_cleared_and_returns_to_idle() {
    let backend = Arc::new(
        MockBackend::new()
            .succeed_with(preview_response())
            .fail_with("boom"),
    );
    let controller = RunController::new(backend.clone());
    let graph = seeded_graph();

    assert_eq!(controller.run(&graph).await, RunOutcome::Completed);
    assert!(controller.has_result("n1"));

    // Entry transition discards the old map; the failure keeps it cleared.
    assert_eq!(controller.run(&graph).await, RunOutcome::Failed);
    assert_eq!(controller.state(), RunState::Idle);
    assert!(controller.results().is_empty());
    assert_eq!(controller.results().status(), None);
}

#[tokio::test]
async fn second_run_while_in_flight_is_rejected() {
    let backend = Arc::new(
        MockBackend::new()
            .with_delay(Duration::from_millis(200))
            .succeed_with(preview_response()),
    );
    let controller = Arc::new(RunController::new(backend.clone()));
    let graph = seeded_graph();

    let in_flight = {
        let controller = controller.clone();
        let graph = graph.clone();
        tokio::spawn(async move { controller.run(&graph).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(controller.state(), RunState::Running);
    assert_eq!(controller.run(&graph).await, RunOutcome::Rejected);

    assert_eq!(in_flight.await.unwrap(), RunOutcome::Completed);
    // Exactly one backend invocation for the two calls.
    assert_eq!(backend.call_count(), 1);
    assert!(controller.has_result("n1"));
}

#[tokio::test]
async fn controller_recovers_after_a_rejected_call() {
    let backend = Arc::new(MockBackend::new().with_delay(Duration::from_millis(100)));
    let controller = Arc::new(RunController::new(backend.clone()));
    let graph = seeded_graph();

    let in_flight = {
        let controller = controller.clone();
        let graph = graph.clone();
        tokio::spawn(async move { controller.run(&graph).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(controller.run(&graph).await, RunOutcome::Rejected);
    in_flight.await.unwrap();

    // Back to idle: the next run dispatches normally.
    assert_eq!(controller.run(&graph).await, RunOutcome::Completed);
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn events_trace_the_run_lifecycle() {
    let backend = Arc::new(MockBackend::new().succeed_with(preview_response()).fail_with("boom"));
    let controller = RunController::new(backend);
    let events = controller.subscribe();
    let graph = seeded_graph();

    controller.run(&graph).await;
    controller.run_node(&graph, "n3").await;

    let started = events.recv().unwrap();
    let RunEvent::Started { run_id, target_node, .. } = &started else {
        panic!("expected Started, got {started:?}");
    };
    assert!(target_node.is_none());

    let completed = events.recv().unwrap();
    let RunEvent::Completed { run_id: completed_id, node_count, .. } = &completed else {
        panic!("expected Completed, got {completed:?}");
    };
    assert_eq!(completed_id, run_id);
    assert_eq!(*node_count, 1);

    let started_scoped = events.recv().unwrap();
    let RunEvent::Started { target_node, .. } = &started_scoped else {
        panic!("expected Started, got {started_scoped:?}");
    };
    assert_eq!(target_node.as_deref(), Some("n3"));

    let failed = events.recv().unwrap();
    let RunEvent::Failed { message, .. } = &failed else {
        panic!("expected Failed, got {failed:?}");
    };
    assert!(message.contains("500"));
}

#[tokio::test]
async fn http_backend_round_trips_the_wire_shapes() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pipeline/run")
                .json_body_partial(r#"{"target_node": "n3"}"#);
            then.status(200).json_body(json!({
                "status": "ok",
                "results": {
                    "n3": {
                        "node_type": "autoencoder",
                        "metrics": {"final_train_loss": 0.042,
                                    "loss_curve": [0.9, 0.3, 0.042]},
                    },
                },
            }));
        })
        .await;

    let backend = Arc::new(HttpBackend::new(ClientConfig::with_base_url(server.base_url())));
    let controller = RunController::new(backend);
    let graph = seeded_graph();

    let outcome = controller.run_node(&graph, "n3").await;

    mock.assert_async().await;
    assert_eq!(outcome, RunOutcome::Completed);
    let results = controller.results();
    let n3 = results.get("n3").expect("n3 result present");
    assert_eq!(n3.loss_curve(), Some(vec![0.9, 0.3, 0.042]));
}

#[tokio::test]
async fn http_backend_maps_server_errors_to_failed_runs() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/pipeline/run");
            then.status(400).body("pipeline contains a cycle");
        })
        .await;

    let backend = Arc::new(HttpBackend::new(ClientConfig::with_base_url(server.base_url())));
    let controller = RunController::new(backend);
    let graph = seeded_graph();

    assert_eq!(controller.run(&graph).await, RunOutcome::Failed);
    assert_eq!(controller.state(), RunState::Idle);
    assert!(controller.results().is_empty());
}

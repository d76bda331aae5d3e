#![allow(dead_code)]

//! Shared fixtures for the integration suites: the reference four-type
//! catalog, the seeded graph, and a scripted mock backend.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pipewright::catalog::{NodeTypeCatalog, NodeTypeDescriptor};
use pipewright::graph::GraphModel;
use pipewright::request::RunRequest;
use pipewright::results::{NodeResult, Preview, RunResponse};
use pipewright::runner::{BackendError, ExecutionBackend};

/// Descriptors matching the reference execution service's registry.
pub fn reference_descriptors() -> Vec<NodeTypeDescriptor> {
    serde_json::from_value(json!([
        {
            "node_type": "data_source",
            "display_name": "Data Source",
            "category": "data",
            "input_ports": [],
            "output_ports": [{"name": "output", "datatype": "dataframe"}],
            "parameter_schema": [
                {"name": "city", "type": "select", "default": "houston",
                 "options": ["houston", "seattle", "denver"]},
                {"name": "train_ratio", "type": "slider",
                 "default": 0.8, "min": 0.5, "max": 0.95, "step": 0.05},
            ],
        },
        {
            "node_type": "preprocess",
            "display_name": "Preprocess",
            "category": "preprocess",
            "input_ports": [{"name": "input", "datatype": "dataframe"}],
            "output_ports": [{"name": "output", "datatype": "processed"}],
            "parameter_schema": [
                {"name": "scaler", "type": "select", "default": "standard",
                 "options": ["standard", "minmax", "none"]},
                {"name": "fill_method", "type": "select", "default": "interpolate",
                 "options": ["interpolate", "ffill", "mean", "zero"]},
                {"name": "add_lag_features", "type": "slider",
                 "default": 3.0, "min": 0.0, "max": 7.0, "step": 1.0},
            ],
        },
        {
            "node_type": "autoencoder",
            "display_name": "Autoencoder",
            "category": "model",
            "input_ports": [{"name": "input", "datatype": "processed"}],
            "output_ports": [{"name": "output", "datatype": "encoded"}],
            "parameter_schema": [
                {"name": "latent_dim", "type": "slider",
                 "default": 5.0, "min": 2.0, "max": 15.0, "step": 1.0},
                {"name": "epochs", "type": "slider",
                 "default": 50.0, "min": 10.0, "max": 200.0, "step": 10.0},
                {"name": "learning_rate", "type": "slider",
                 "default": 0.001, "min": 0.0001, "max": 0.01, "step": 0.0001},
                {"name": "batch_size", "type": "slider",
                 "default": 32.0, "min": 8.0, "max": 128.0, "step": 8.0},
            ],
        },
        {
            "node_type": "xgboost",
            "display_name": "XGBoost",
            "category": "model",
            "input_ports": [{"name": "input", "datatype": "processed"}],
            "output_ports": [{"name": "output", "datatype": "predictions"}],
            "parameter_schema": [
                {"name": "n_estimators", "type": "slider",
                 "default": 100.0, "min": 10.0, "max": 500.0, "step": 10.0},
                {"name": "max_depth", "type": "slider",
                 "default": 6.0, "min": 2.0, "max": 15.0, "step": 1.0},
                {"name": "learning_rate", "type": "slider",
                 "default": 0.1, "min": 0.01, "max": 0.3, "step": 0.01},
                {"name": "subsample", "type": "slider",
                 "default": 0.8, "min": 0.5, "max": 1.0, "step": 0.05},
            ],
        },
    ]))
    .expect("reference descriptors decode")
}

pub fn reference_catalog() -> std::sync::Arc<NodeTypeCatalog> {
    std::sync::Arc::new(NodeTypeCatalog::from_descriptors(reference_descriptors()))
}

/// The built-in starter pipeline bound to the reference catalog.
pub fn seeded_graph() -> GraphModel {
    GraphModel::seeded(reference_catalog())
}

/// A response with one data-source result, shaped like the reference
/// service's answer.
pub fn preview_response() -> RunResponse {
    let mut results = FxHashMap::default();
    results.insert(
        "n1".to_string(),
        NodeResult {
            node_type: Some("data_source".into()),
            metrics: None,
            preview: Some(Preview {
                columns: vec!["date".into(), "temp".into()],
                rows: 100,
                train_rows: Some(80),
                test_rows: Some(20),
                sample: vec![json!({"date": "2024-01-01", "temp": 12.5})],
            }),
        },
    );
    RunResponse {
        status: "ok".into(),
        results,
    }
}

enum MockReply {
    Succeed(RunResponse),
    Fail(String),
}

/// Scripted in-process backend: pops one reply per call, counts
/// invocations, optionally sleeps to keep a run in flight, and records the
/// last request for assertions.
pub struct MockBackend {
    script: Mutex<VecDeque<MockReply>>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<RunRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn succeed_with(self, response: RunResponse) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(MockReply::Succeed(response));
        self
    }

    pub fn fail_with(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(MockReply::Fail(message.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn take_last_request(&self) -> Option<RunRequest> {
        self.last_request.lock().unwrap().take()
    }
}

#[async_trait]
impl ExecutionBackend for MockBackend {
    async fn execute(&self, request: &RunRequest) -> Result<RunResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Succeed(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(BackendError::Status {
                status: 500,
                body: message,
            }),
            None => Ok(RunResponse {
                status: "ok".into(),
                results: FxHashMap::default(),
            }),
        }
    }
}

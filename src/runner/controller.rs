//! The run state machine.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::instrument;
use uuid::Uuid;

use super::backend::ExecutionBackend;
use super::events::RunEvent;
use crate::graph::GraphModel;
use crate::request::{self, RunRequest};
use crate::results::ResultStore;

/// Whether a run is currently in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// How a `run`/`run_node` call ended. Deliberately not a `Result`: a
/// failed run is a reported condition, not a fault for the caller to
/// handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Backend answered; results replaced.
    Completed,
    /// Backend call failed; results stay cleared, details logged and
    /// emitted as [`RunEvent::Failed`].
    Failed,
    /// Another run was already in flight; nothing was dispatched.
    Rejected,
}

struct Inner {
    state: RunState,
    results: ResultStore,
}

/// Orchestrates runs against the execution backend.
///
/// Methods take `&self`: the controller is made to be shared (behind an
/// `Arc`) between the widget that triggers runs and the views that read
/// results. Views read snapshots; there is no live borrow into the store.
///
/// The request is serialized from the graph at call time, so mutations
/// made while the call is suspended on the network affect the *next* run,
/// never the one in flight.
pub struct RunController {
    backend: Arc<dyn ExecutionBackend>,
    inner: Mutex<Inner>,
    event_tx: flume::Sender<RunEvent>,
    event_rx: flume::Receiver<RunEvent>,
}

impl RunController {
    /// Capacity of the run-event channel; past it, events are dropped.
    const EVENT_CAPACITY: usize = 256;

    #[must_use]
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        let (event_tx, event_rx) = flume::bounded(Self::EVENT_CAPACITY);
        Self {
            backend,
            inner: Mutex::new(Inner {
                state: RunState::Idle,
                results: ResultStore::new(),
            }),
            event_tx,
            event_rx,
        }
    }

    /// Current state of the machine.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.lock_inner().state
    }

    /// Snapshot of the current results map.
    #[must_use]
    pub fn results(&self) -> ResultStore {
        self.lock_inner().results.clone()
    }

    /// Node-level "has results" flag without cloning the store.
    #[must_use]
    pub fn has_result(&self, node_id: &str) -> bool {
        self.lock_inner().results.has_result(node_id)
    }

    /// Subscribe to run lifecycle events. Multiple subscribers compete for
    /// events (work-queue semantics); one subscriber is the normal case.
    #[must_use]
    pub fn subscribe(&self) -> flume::Receiver<RunEvent> {
        self.event_rx.clone()
    }

    /// Execute the full graph.
    ///
    /// Clears previous results immediately, serializes the request, and
    /// suspends on the backend call. Returns [`RunOutcome::Rejected`]
    /// without touching anything if a run is already in flight.
    pub async fn run(&self, graph: &GraphModel) -> RunOutcome {
        self.dispatch(request::build_full_request(graph)).await
    }

    /// Execute only `target_node` and whatever it depends on. The upstream
    /// closure is resolved by the execution service; the request still
    /// carries the full graph.
    pub async fn run_node(&self, graph: &GraphModel, target_node: &str) -> RunOutcome {
        self.dispatch(request::build_scoped_request(graph, target_node))
            .await
    }

    #[instrument(skip(self, request), fields(target = ?request.target_node))]
    async fn dispatch(&self, request: RunRequest) -> RunOutcome {
        let run_id = Uuid::new_v4().to_string();
        {
            let mut inner = self.lock_inner();
            if inner.state == RunState::Running {
                tracing::debug!(run_id = %run_id, "run rejected: another run is in flight");
                return RunOutcome::Rejected;
            }
            inner.state = RunState::Running;
            inner.results.clear();
        }
        self.emit(RunEvent::started(&run_id, request.target_node.clone()));
        tracing::info!(
            run_id = %run_id,
            nodes = request.nodes.len(),
            edges = request.edges.len(),
            "pipeline run dispatched"
        );

        match self.backend.execute(&request).await {
            Ok(response) => {
                let node_count = response.results.len();
                {
                    let mut inner = self.lock_inner();
                    inner.results.replace(response);
                    inner.state = RunState::Idle;
                }
                tracing::info!(run_id = %run_id, node_count, "pipeline run completed");
                self.emit(RunEvent::completed(&run_id, node_count));
                RunOutcome::Completed
            }
            Err(err) => {
                self.lock_inner().state = RunState::Idle;
                tracing::warn!(run_id = %run_id, error = %err, "pipeline run failed");
                self.emit(RunEvent::failed(&run_id, err.to_string()));
                RunOutcome::Failed
            }
        }
    }

    fn emit(&self, event: RunEvent) {
        // Dropped when full or unsubscribed; notification never blocks.
        let _ = self.event_tx.try_send(event);
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("run state lock poisoned")
    }
}

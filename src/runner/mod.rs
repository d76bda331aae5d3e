//! Run orchestration: the state machine between the graph and the
//! execution service.
//!
//! [`RunController`] enforces the session's run lifecycle:
//!
//! - at most one run in flight (`Idle` ⇄ `Running`)
//! - results are cleared on entry, replaced wholesale on success, and left
//!   cleared on failure
//! - a failed run is reported (log + [`RunEvent::Failed`]) but never
//!   propagates as a fault into the presentation layer
//!
//! The execution service itself sits behind the [`ExecutionBackend`] seam;
//! [`HttpBackend`] is the production implementation. Cancellation and
//! timeouts are transport concerns; the controller has neither.

mod backend;
mod controller;
mod events;

pub use backend::{BackendError, ExecutionBackend, HttpBackend};
pub use controller::{RunController, RunOutcome, RunState};
pub use events::RunEvent;

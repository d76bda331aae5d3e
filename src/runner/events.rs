//! Non-blocking run lifecycle notifications.
//!
//! The controller emits one [`RunEvent`] per lifecycle transition over a
//! bounded channel. Subscribers (status bars, toasts) drain it at their
//! own pace; with no subscriber, or a full channel, events are dropped,
//! since notification must never block or fail a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle notification for one run attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// A run was dispatched to the execution service.
    Started {
        run_id: String,
        /// Target node for a scoped run, absent for a full-graph run.
        target_node: Option<String>,
        when: DateTime<Utc>,
    },
    /// The service answered and the results map was replaced.
    Completed {
        run_id: String,
        node_count: usize,
        when: DateTime<Utc>,
    },
    /// The call failed; results remain cleared.
    Failed {
        run_id: String,
        message: String,
        when: DateTime<Utc>,
    },
}

impl RunEvent {
    pub(crate) fn started(run_id: &str, target_node: Option<String>) -> Self {
        Self::Started {
            run_id: run_id.to_string(),
            target_node,
            when: Utc::now(),
        }
    }

    pub(crate) fn completed(run_id: &str, node_count: usize) -> Self {
        Self::Completed {
            run_id: run_id.to_string(),
            node_count,
            when: Utc::now(),
        }
    }

    pub(crate) fn failed(run_id: &str, message: impl Into<String>) -> Self {
        Self::Failed {
            run_id: run_id.to_string(),
            message: message.into(),
            when: Utc::now(),
        }
    }

    /// The run this event belongs to.
    #[must_use]
    pub fn run_id(&self) -> &str {
        match self {
            Self::Started { run_id, .. }
            | Self::Completed { run_id, .. }
            | Self::Failed { run_id, .. } => run_id,
        }
    }
}

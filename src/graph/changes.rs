//! Change-sets reported by the presentation layer.
//!
//! The canvas owns gestures; the model owns semantics. A drag, delete, or
//! click arrives here as plain data and is applied by
//! [`GraphModel`](super::GraphModel) in one batch.

use super::node::Position;

/// One structural edit to the node collection.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
    /// Node moved on the canvas.
    Move { id: String, position: Position },
    /// Node deleted; incident edges go with it in the same batch.
    Remove { id: String },
    /// Node clicked (`selected = true`) or deselected. Selection is
    /// exclusive: selecting one node deselects the previous.
    Select { id: String, selected: bool },
}

/// One structural edit to the edge collection.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
    Remove { id: String },
}

/// A candidate edge from a user connection gesture, not yet validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    /// Convenience for the common single-port case.
    #[must_use]
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    #[must_use]
    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }
}

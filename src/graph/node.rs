//! Node and edge records owned by the graph model.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canvas position of a node. Layout only; execution ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One pipeline stage placed on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
    /// Graph-unique id (`n{N}`), generated client-side, never reused.
    pub id: String,
    /// Key into the node-type catalog. A lookup, not ownership: the
    /// descriptor may be absent when the catalog failed to load.
    pub node_type: String,
    /// Display label, seeded from the descriptor's display name and
    /// independently editable afterwards.
    pub label: String,
    pub position: Position,
    /// Sparse parameter values. Keys are a subset of the descriptor's
    /// schema names; absent keys read as the schema default.
    pub params: FxHashMap<String, Value>,
}

/// A directed connection between two node ports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEdge {
    /// Graph-unique id. Generated edges use `e{N}`; the seeded pipeline
    /// keeps its `e{src}-{tgt}` names.
    pub id: String,
    pub source: String,
    pub target: String,
    /// Absent handles mean the node type has a single canonical port and
    /// project to `"output"` on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Same as `source_handle`, projecting to `"input"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl PipelineEdge {
    /// True if this edge touches the given node on either side.
    #[must_use]
    pub fn is_incident_to(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

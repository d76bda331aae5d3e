//! Wire-shape projection for the execution service.
//!
//! Pure transforms, no side effects: a [`GraphModel`] in, a [`RunRequest`]
//! out. The full graph is always sent, even for a scoped run, because
//! the upstream execution closure is computed by the execution service's
//! scheduler, not here. Duplicating that traversal client-side would
//! invite divergence from whatever backend-only constraints the scheduler
//! also honors.
//!
//! # JSON Serialization Format
//!
//! ```json
//! {
//!   "nodes": [{"id": "n1", "type": "data_source", "params": {"city": "houston"}}],
//!   "edges": [{"source": "n1", "sourceHandle": "output",
//!              "target": "n2", "targetHandle": "input"}],
//!   "target_node": null
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::{GraphModel, PipelineEdge};

/// Default handle names for single-port node types whose edges carry no
/// explicit handle.
pub const DEFAULT_SOURCE_HANDLE: &str = "output";
pub const DEFAULT_TARGET_HANDLE: &str = "input";

/// One node as the execution service sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub params: Map<String, Value>,
}

/// One edge as the execution service sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source: String,
    #[serde(rename = "sourceHandle")]
    pub source_handle: String,
    pub target: String,
    #[serde(rename = "targetHandle")]
    pub target_handle: String,
}

/// The complete run request. `target_node: None` asks for a full-graph
/// run; `Some(id)` asks the service to execute only what that node
/// depends on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub target_node: Option<String>,
}

/// Project the whole graph for a full run.
///
/// Node params are densified with the sparse-then-default resolution of
/// [`GraphModel::resolved_params`]; absent edge handles take the canonical
/// `"output"`/`"input"` names for backward compatibility with single-port
/// types.
#[must_use]
pub fn build_full_request(graph: &GraphModel) -> RunRequest {
    RunRequest {
        nodes: project_nodes(graph),
        edges: project_edges(graph),
        target_node: None,
    }
}

/// Project the whole graph, scoped to a target node.
///
/// Identical projection: the service receives every node and edge and
/// resolves the target's upstream closure itself.
#[must_use]
pub fn build_scoped_request(graph: &GraphModel, target_node: &str) -> RunRequest {
    RunRequest {
        target_node: Some(target_node.to_string()),
        ..build_full_request(graph)
    }
}

fn project_nodes(graph: &GraphModel) -> Vec<NodeSpec> {
    graph
        .nodes()
        .iter()
        .map(|node| NodeSpec {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            params: graph.resolved_params(node),
        })
        .collect()
}

fn project_edges(graph: &GraphModel) -> Vec<EdgeSpec> {
    graph.edges().iter().map(project_edge).collect()
}

fn project_edge(edge: &PipelineEdge) -> EdgeSpec {
    EdgeSpec {
        source: edge.source.clone(),
        source_handle: edge
            .source_handle
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE_HANDLE.to_string()),
        target: edge.target.clone(),
        target_handle: edge
            .target_handle
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET_HANDLE.to_string()),
    }
}

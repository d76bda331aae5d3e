//! The graph model and its mutation operations.

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value, json};
use std::sync::Arc;

use super::changes::{Connection, EdgeChange, NodeChange};
use super::node::{PipelineEdge, PipelineNode, Position};
use crate::catalog::NodeTypeCatalog;

/// Authoritative owner of the pipeline graph.
///
/// All mutation goes through the operations below; every structural
/// rejection (unknown type, self-loop, dangling endpoint) is a silent
/// no-op logged at debug level, never an error surfaced to the caller.
/// The canvas and parameter panel are pure functions of the accessors.
///
/// ```
/// use pipewright::catalog::NodeTypeCatalog;
/// use pipewright::graph::{Connection, GraphModel};
/// use std::sync::Arc;
///
/// let mut graph = GraphModel::new(Arc::new(NodeTypeCatalog::empty()));
/// // Self-loops are rejected at connection time.
/// graph.connect(Connection::between("n1", "n1"));
/// assert!(graph.edges().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct GraphModel {
    catalog: Arc<NodeTypeCatalog>,
    nodes: Vec<PipelineNode>,
    edges: Vec<PipelineEdge>,
    selected: Option<String>,
    next_id: u64,
}

impl GraphModel {
    /// An empty graph bound to the session's catalog.
    #[must_use]
    pub fn new(catalog: Arc<NodeTypeCatalog>) -> Self {
        Self {
            catalog,
            nodes: Vec::new(),
            edges: Vec::new(),
            selected: None,
            next_id: 1,
        }
    }

    /// The built-in starter pipeline shown at session start:
    /// `data_source → preprocess → autoencoder → xgboost`.
    ///
    /// Seed params intentionally match each type's schema defaults; the id
    /// counter starts past the seeded range so generated ids never collide.
    #[must_use]
    pub fn seeded(catalog: Arc<NodeTypeCatalog>) -> Self {
        let params = |pairs: &[(&str, Value)]| -> FxHashMap<String, Value> {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect()
        };

        let nodes = vec![
            PipelineNode {
                id: "n1".into(),
                node_type: "data_source".into(),
                label: "Data Source".into(),
                position: Position { x: 50.0, y: 200.0 },
                params: params(&[("city", json!("houston")), ("train_ratio", json!(0.8))]),
            },
            PipelineNode {
                id: "n2".into(),
                node_type: "preprocess".into(),
                label: "Preprocess".into(),
                position: Position { x: 320.0, y: 200.0 },
                params: params(&[
                    ("scaler", json!("standard")),
                    ("fill_method", json!("interpolate")),
                    ("add_lag_features", json!(3)),
                ]),
            },
            PipelineNode {
                id: "n3".into(),
                node_type: "autoencoder".into(),
                label: "Autoencoder".into(),
                position: Position { x: 590.0, y: 200.0 },
                params: params(&[
                    ("latent_dim", json!(5)),
                    ("epochs", json!(50)),
                    ("learning_rate", json!(0.001)),
                    ("batch_size", json!(32)),
                ]),
            },
            PipelineNode {
                id: "n4".into(),
                node_type: "xgboost".into(),
                label: "XGBoost".into(),
                position: Position { x: 860.0, y: 200.0 },
                params: params(&[
                    ("n_estimators", json!(100)),
                    ("max_depth", json!(6)),
                    ("learning_rate", json!(0.1)),
                    ("subsample", json!(0.8)),
                ]),
            },
        ];
        let edges = vec![
            seed_edge("e1-2", "n1", "n2"),
            seed_edge("e2-3", "n2", "n3"),
            seed_edge("e3-4", "n3", "n4"),
        ];

        Self {
            catalog,
            nodes,
            edges,
            selected: None,
            next_id: 10,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn nodes(&self) -> &[PipelineNode] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[PipelineEdge] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, node_id: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// The exclusively-selected node, if any. Drives the parameter panel;
    /// has no effect on execution.
    #[must_use]
    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn catalog(&self) -> &NodeTypeCatalog {
        &self.catalog
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Place a new node of the given type.
    ///
    /// Unknown types are a no-op: the catalog and the palette should never
    /// disagree, but a stale palette entry must not crash the session.
    /// On success the node's params are eagerly populated with every
    /// schema default so the parameter panel is immediately editable.
    pub fn add_node(&mut self, node_type: &str, position: Position) {
        let Some(descriptor) = self.catalog.lookup(node_type) else {
            tracing::debug!(node_type, "ignoring add_node for unknown type");
            return;
        };
        let params: FxHashMap<String, Value> = descriptor
            .parameter_schema
            .iter()
            .map(|p| (p.name.clone(), p.default_value()))
            .collect();
        let label = descriptor.display_name.clone();
        let id = format!("n{}", self.alloc_id());
        self.nodes.push(PipelineNode {
            id,
            node_type: node_type.to_string(),
            label,
            position,
            params,
        });
    }

    /// Apply a batch of node edits from the presentation layer.
    ///
    /// Moves and selection mutate in place; removals are collected and
    /// applied once at the end of the batch together with the cascade
    /// delete of incident edges, so the collections are never observable
    /// in a half-deleted state.
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
        let mut removed: FxHashSet<String> = FxHashSet::default();
        for change in changes {
            match change {
                NodeChange::Move { id, position } => {
                    if let Some(node) = self.node_mut(&id) {
                        node.position = position;
                    }
                }
                NodeChange::Remove { id } => {
                    removed.insert(id);
                }
                NodeChange::Select { id, selected } => {
                    if selected {
                        if self.node(&id).is_some() {
                            self.selected = Some(id);
                        }
                    } else if self.selected.as_deref() == Some(id.as_str()) {
                        self.selected = None;
                    }
                }
            }
        }
        if !removed.is_empty() {
            self.nodes.retain(|n| !removed.contains(&n.id));
            self.edges
                .retain(|e| !removed.contains(&e.source) && !removed.contains(&e.target));
            if let Some(selected) = &self.selected
                && removed.contains(selected)
            {
                self.selected = None;
            }
        }
    }

    /// Apply a batch of edge edits from the presentation layer.
    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
        let removed: FxHashSet<String> = changes
            .into_iter()
            .map(|EdgeChange::Remove { id }| id)
            .collect();
        if !removed.is_empty() {
            self.edges.retain(|e| !removed.contains(&e.id));
        }
    }

    /// Validate and append a candidate edge from a connection gesture.
    ///
    /// Rejected silently: self-loops, endpoints missing from the graph,
    /// and, when the catalog knows the endpoint's type, handles that
    /// name ports the descriptor does not declare. Fan-in and fan-out are
    /// both legal; no duplicate-edge check is made.
    pub fn connect(&mut self, candidate: Connection) {
        if candidate.source == candidate.target {
            tracing::debug!(node = %candidate.source, "rejecting self-loop connection");
            return;
        }
        let (Some(source), Some(target)) =
            (self.node(&candidate.source), self.node(&candidate.target))
        else {
            tracing::debug!(
                source = %candidate.source,
                target = %candidate.target,
                "rejecting connection with missing endpoint"
            );
            return;
        };
        if let Some(handle) = &candidate.source_handle
            && let Some(descriptor) = self.catalog.lookup(&source.node_type)
            && !descriptor.has_output_port(handle)
        {
            tracing::debug!(
                node_type = %source.node_type,
                handle = %handle,
                "rejecting connection from undeclared output port"
            );
            return;
        }
        if let Some(handle) = &candidate.target_handle
            && let Some(descriptor) = self.catalog.lookup(&target.node_type)
            && !descriptor.has_input_port(handle)
        {
            tracing::debug!(
                node_type = %target.node_type,
                handle = %handle,
                "rejecting connection to undeclared input port"
            );
            return;
        }
        let id = format!("e{}", self.alloc_id());
        self.edges.push(PipelineEdge {
            id,
            source: candidate.source,
            target: candidate.target,
            source_handle: candidate.source_handle,
            target_handle: candidate.target_handle,
        });
    }

    /// Overwrite one parameter value on a node.
    ///
    /// Values are not checked against the schema's constraints here; the
    /// input control produces in-range values and the execution service is
    /// the authority on rejecting the rest.
    pub fn set_param(&mut self, node_id: &str, name: &str, value: Value) {
        if let Some(node) = self.node_mut(node_id) {
            node.params.insert(name.to_string(), value);
        } else {
            tracing::debug!(node_id, name, "ignoring set_param for missing node");
        }
    }

    /// Rename a node's display label.
    pub fn set_label(&mut self, node_id: &str, label: impl Into<String>) {
        if let Some(node) = self.node_mut(node_id) {
            node.label = label.into();
        }
    }

    /// Set or clear the exclusive selection. Selecting an id absent from
    /// the graph is a no-op.
    pub fn select(&mut self, node_id: Option<&str>) {
        match node_id {
            Some(id) if self.node(id).is_some() => self.selected = Some(id.to_string()),
            Some(_) => {}
            None => self.selected = None,
        }
    }

    // ------------------------------------------------------------------
    // Parameter resolution
    // ------------------------------------------------------------------

    /// Read one parameter: the node's sparse map first, then the schema
    /// default. `None` when the node is missing or the name is neither set
    /// nor declared.
    #[must_use]
    pub fn resolve_param(&self, node_id: &str, name: &str) -> Option<Value> {
        let node = self.node(node_id)?;
        if let Some(value) = node.params.get(name) {
            return Some(value.clone());
        }
        self.catalog
            .lookup(&node.node_type)?
            .param(name)
            .map(|p| p.default_value())
    }

    /// Densify a node's params for the wire: every schema name resolved
    /// with the same sparse-then-default rule. Nodes whose type the
    /// catalog does not know pass their stored params through unchanged.
    #[must_use]
    pub fn resolved_params(&self, node: &PipelineNode) -> Map<String, Value> {
        match self.catalog.lookup(&node.node_type) {
            Some(descriptor) => descriptor
                .parameter_schema
                .iter()
                .map(|p| {
                    let value = node
                        .params
                        .get(&p.name)
                        .cloned()
                        .unwrap_or_else(|| p.default_value());
                    (p.name.clone(), value)
                })
                .collect(),
            None => node
                .params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    fn node_mut(&mut self, node_id: &str) -> Option<&mut PipelineNode> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn seed_edge(id: &str, source: &str, target: &str) -> PipelineEdge {
    PipelineEdge {
        id: id.into(),
        source: source.into(),
        target: target.into(),
        source_handle: Some("output".into()),
        target_handle: Some("input".into()),
    }
}

//! The authoritative pipeline graph: nodes, edges, parameters, selection.
//!
//! [`GraphModel`] owns the node and edge collections the canvas renders
//! and the execution request is built from. The presentation layer never
//! mutates them directly; it reports user edits back as change-set batches
//! ([`NodeChange`], [`EdgeChange`]) or candidate connections
//! ([`Connection`]), and the model enforces the structural invariants:
//!
//! - node ids are fresh and never reused within a session
//! - removing a node removes every incident edge in the same batch
//! - no self-loops, no edges to missing nodes
//! - at most one node selected at a time
//!
//! Parameter values are stored sparsely per node; reads fall back to the
//! catalog schema's default through [`GraphModel::resolve_param`].

mod changes;
mod model;
mod node;


pub use changes::{Connection, EdgeChange, NodeChange};
pub use model::GraphModel;
pub use node::{PipelineEdge, PipelineNode, Position};

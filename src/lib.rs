//! # Pipewright: Pipeline Graph Model & Run Orchestration
//!
//! Pipewright is the client-side core of a visual ML-pipeline editor: the
//! authoritative in-memory graph of pipeline stages, the node-type catalog
//! that drives parameter editing, the wire projection sent to a remote
//! execution service, and the run state machine that merges results back
//! onto the graph.
//!
//! ## Core Concepts
//!
//! - **Catalog**: immutable session registry of node types, their ports and
//!   editable parameter schemas
//! - **GraphModel**: owned node/edge collections, parameter maps, and the
//!   exclusive node selection
//! - **Request building**: pure projection of the graph into the execution
//!   service's wire shape, full-graph or scoped to a target node
//! - **RunController**: at-most-one-run-in-flight orchestration with
//!   wholesale result replacement and non-fatal failure reporting
//! - **ResultStore**: the latest per-node results map, replaced atomically
//!
//! ## Quick Start
//!
//! ```
//! use pipewright::catalog::NodeTypeCatalog;
//! use pipewright::graph::{GraphModel, Position};
//! use pipewright::request;
//! use std::sync::Arc;
//!
//! // An empty catalog still yields a working (if unpopulated) model; a
//! // real session loads descriptors through a CatalogSource first.
//! let catalog = Arc::new(NodeTypeCatalog::empty());
//! let mut graph = GraphModel::new(catalog);
//!
//! // Unknown types are a defensive no-op rather than an error.
//! graph.add_node("data_source", Position { x: 50.0, y: 200.0 });
//! assert!(graph.nodes().is_empty());
//!
//! let request = request::build_full_request(&graph);
//! assert!(request.target_node.is_none());
//! ```
//!
//! Driving a run against an execution service:
//!
//! ```no_run
//! use pipewright::config::ClientConfig;
//! use pipewright::runner::{HttpBackend, RunController};
//! use std::sync::Arc;
//! # async fn example(graph: pipewright::graph::GraphModel) {
//! let backend = Arc::new(HttpBackend::new(ClientConfig::from_env()));
//! let controller = RunController::new(backend);
//!
//! // A failed run logs and reports; it never propagates a fault.
//! let outcome = controller.run(&graph).await;
//! println!("run finished: {outcome:?}");
//! # }
//! ```
//!
//! ## Module Guide
//!
//! - [`catalog`] - Node-type descriptors, catalog cache, and the fetch seam
//! - [`graph`] - Graph model, change-sets, and parameter resolution
//! - [`request`] - Wire-shape projection for the execution service
//! - [`runner`] - Run state machine, backend seam, and run events
//! - [`results`] - Result wire model and the result store
//! - [`config`] - Environment-driven endpoint configuration
//! - [`telemetry`] - Tracing subscriber bootstrap

pub mod catalog;
pub mod config;
pub mod graph;
pub mod request;
pub mod results;
pub mod runner;
pub mod telemetry;

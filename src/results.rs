//! Run results: wire model and the session's result store.
//!
//! The execution service answers a run with one result record per node it
//! executed. The whole map is replaced atomically at the end of a
//! successful run; a failed run leaves the store cleared (the entry
//! transition already discarded the stale map). There are no partial
//! merges.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Full response from the execution service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub status: String,
    #[serde(default)]
    pub results: FxHashMap<String, NodeResult>,
}

/// Result payload for one executed node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    /// Echo of the node type that was executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Metric name to scalar or structured series (loss curves, chart
    /// series); shapes are service-defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FxHashMap<String, Value>>,
    /// Data sample, present only for data-producing node types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

/// Row/column sample carried by data-producing nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_rows: Option<u64>,
    #[serde(default)]
    pub sample: Vec<Value>,
}

/// One point of a regression chart series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub actual: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted: Option<f64>,
}

impl NodeResult {
    /// Regression chart series, when the node emitted one under the
    /// `chart_data` metric key. Malformed entries are skipped rather than
    /// failing the whole series.
    #[must_use]
    pub fn chart_data(&self) -> Option<Vec<ChartPoint>> {
        let series = self.metric("chart_data")?.as_array()?;
        Some(
            series
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect(),
        )
    }

    /// Per-epoch training losses, when the node emitted a `loss_curve`
    /// metric.
    #[must_use]
    pub fn loss_curve(&self) -> Option<Vec<f64>> {
        let curve = self.metric("loss_curve")?.as_array()?;
        Some(curve.iter().filter_map(Value::as_f64).collect())
    }

    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&Value> {
        self.metrics.as_ref()?.get(name)
    }
}

/// Holds the latest results map for display and per-node flags.
#[derive(Clone, Debug, Default)]
pub struct ResultStore {
    status: Option<String>,
    results: FxHashMap<String, NodeResult>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole store with a fresh response.
    pub fn replace(&mut self, response: RunResponse) {
        self.status = Some(response.status);
        self.results = response.results;
    }

    /// Discard everything (run entry transition).
    pub fn clear(&mut self) {
        self.status = None;
        self.results.clear();
    }

    /// Status string of the run that produced the current map, if any.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[must_use]
    pub fn get(&self, node_id: &str) -> Option<&NodeResult> {
        self.results.get(node_id)
    }

    /// Node-level "has results" flag for canvas badges.
    #[must_use]
    pub fn has_result(&self, node_id: &str) -> bool {
        self.results.contains_key(node_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NodeResult)> {
        self.results.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

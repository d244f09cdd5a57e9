//! Runtime types.

use chrono::{DateTime, Utc};
use lexigraph_core::{Entity, RecordingId, Relationship};
use lexigraph_store::{GraphFragment, GraphSummary, GraphView, MergeStats};
use serde::{Deserialize, Serialize};

/// A recording handed over by the upstream pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordingInput {
    /// Placeholder 0 until the recording is persisted.
    #[serde(default)]
    pub recording_id: RecordingId,
    pub transcript: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

/// Outcome of building one recording into the graph.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub recording_id: RecordingId,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub graph_data: GraphFragment,
    pub merge: MergeStats,
    pub built_at: DateTime<Utc>,
}

/// The graph of one recording (or all) with its summary.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingGraph {
    pub graph_data: GraphView,
    pub summary: GraphSummary,
}

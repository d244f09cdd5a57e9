//! Query result types.

use lexigraph_core::RecordingId;
use lexigraph_store::GraphStats;
use serde::{Deserialize, Serialize};

/// A graph query as received from callers.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub recording_id: Option<RecordingId>,
}

/// A store node whose label matched a query term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub confidence: f64,
}

/// How a related concept reached the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    /// One edge away from a query term, in either direction.
    Direct,
}

/// A neighbour of a node named by the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedConcept {
    pub concept: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub connection: Connection,
}

/// Result of a graph query. The default value is the empty-shaped result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub relevant_nodes: Vec<RelevantNode>,
    /// Node id sequences, both ends included.
    pub paths: Vec<Vec<String>>,
    pub related_concepts: Vec<RelatedConcept>,
    /// Whole-store counts, never scoped to a recording.
    pub graph_stats: GraphStats,
}

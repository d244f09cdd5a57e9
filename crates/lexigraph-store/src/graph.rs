//! Knowledge graph backend using petgraph.
//!
//! One directed graph holds every recording. Nodes are keyed by string id.
//! Between two nodes there is at most one edge per relationship type.
//! Nothing is ever removed.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use lexigraph_core::{recording_scope, Error, RecordingId, Result};
use parking_lot::RwLock;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

/// Shared handle to the process-wide store.
pub type GraphHandle = Arc<RwLock<GraphStore>>;

/// A node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub confidence: f64,
    pub recording_id: RecordingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
}

/// An edge in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub confidence: f64,
    pub recording_id: RecordingId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// What happened to an edge offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Added,
    /// Same endpoints and type already present; attributes replaced.
    Updated,
    /// An endpoint is not a store node.
    Dropped,
}

/// Nodes and edges of the whole graph or of one recording.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// In-memory knowledge graph accumulated across recordings.
pub struct GraphStore {
    graph: DiGraph<GraphNode, GraphEdge>,
    node_index: HashMap<String, NodeIndex>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Wrap the store in a shareable handle.
    pub fn into_handle(self) -> GraphHandle {
        Arc::new(RwLock::new(self))
    }

    /// Insert a node, or replace all attributes of the node with that id.
    ///
    /// Returns true if the node is new.
    pub fn upsert_node(&mut self, node: GraphNode) -> bool {
        match self.node_index.get(&node.id) {
            Some(&idx) => {
                self.graph[idx] = node;
                false
            }
            None => {
                let id = node.id.clone();
                let idx = self.graph.add_node(node);
                self.node_index.insert(id, idx);
                true
            }
        }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.graph.edge_weights()
    }

    /// Insert an edge between two existing nodes.
    ///
    /// An edge whose endpoints and relationship type match an existing edge
    /// replaces its attributes. Edges touching unknown nodes are dropped.
    pub fn upsert_edge(&mut self, edge: GraphEdge) -> EdgeOutcome {
        let (Some(&from), Some(&to)) = (self.node_index.get(&edge.source), self.node_index.get(&edge.target))
        else {
            return EdgeOutcome::Dropped;
        };

        let existing = self
            .graph
            .edges_connecting(from, to)
            .find(|e| e.weight().relationship == edge.relationship)
            .map(|e| e.id());

        match existing {
            Some(edge_id) => {
                self.graph[edge_id] = edge;
                EdgeOutcome::Updated
            }
            None => {
                self.graph.add_edge(from, to, edge);
                EdgeOutcome::Added
            }
        }
    }

    /// Whether any edge runs from `source` to `target`.
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.node_index.get(source), self.node_index.get(target)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Whether an edge joins the two nodes in either direction.
    pub fn is_adjacent(&self, a: &str, b: &str) -> bool {
        self.has_edge(a, b) || self.has_edge(b, a)
    }

    /// Fewest-hop directed path from `from` to `to`, both ends included.
    ///
    /// Breadth-first; among equally short paths the one using earlier
    /// inserted edges wins. `Ok(None)` means no path exists.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<Option<Vec<String>>> {
        let start = *self
            .node_index
            .get(from)
            .ok_or_else(|| Error::NodeNotFound(from.to_string()))?;
        let goal = *self
            .node_index
            .get(to)
            .ok_or_else(|| Error::NodeNotFound(to.to_string()))?;

        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                return Ok(Some(self.unwind(&previous, start, goal)));
            }

            let mut outgoing: Vec<_> = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .map(|e| (e.id(), e.target()))
                .collect();
            outgoing.sort_by_key(|(edge_id, _)| edge_id.index());

            for (_, next) in outgoing {
                if visited.insert(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        Ok(None)
    }

    fn unwind(
        &self,
        previous: &HashMap<NodeIndex, NodeIndex>,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Vec<String> {
        let mut path = vec![self.graph[goal].id.clone()];
        let mut current = goal;
        while current != start {
            current = previous[&current];
            path.push(self.graph[current].id.clone());
        }
        path.reverse();
        path
    }

    /// Nodes and edges tagged with `recording_id`, or everything when the id
    /// is absent or the placeholder.
    pub fn view(&self, recording_id: Option<RecordingId>) -> GraphView {
        let scope = recording_scope(recording_id);
        let matches = |rid: RecordingId| scope.map_or(true, |wanted| wanted == rid);
        GraphView {
            nodes: self.nodes().filter(|n| matches(n.recording_id)).cloned().collect(),
            edges: self.edges().filter(|e| matches(e.recording_id)).cloned().collect(),
        }
    }

    /// Get graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_nodes: self.graph.node_count(),
            total_edges: self.graph.edge_count(),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
}

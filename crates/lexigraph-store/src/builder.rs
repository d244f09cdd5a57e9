//! Turning one recording's extraction output into graph nodes and edges.

use lexigraph_core::{
    identity_key, Entity, GraphLimits, RecordingId, Relationship, KEY_POINT_LABEL,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::{EdgeOutcome, GraphEdge, GraphNode, GraphStore};

/// Nodes and edges derived from one recording, before merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphFragment {
    pub recording_id: RecordingId,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Counts from merging a fragment into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub nodes_added: usize,
    pub nodes_updated: usize,
    pub edges_added: usize,
    pub edges_updated: usize,
    pub edges_dropped: usize,
}

pub struct GraphBuilder {
    key_point_label_chars: usize,
}

impl GraphBuilder {
    pub fn new(limits: &GraphLimits) -> Self {
        Self {
            key_point_label_chars: limits.key_point_label_chars,
        }
    }

    /// Build the fragment for one recording.
    ///
    /// Entity nodes are keyed by the entity's identity key and labelled with
    /// its text. Key point `i` becomes node `keypoint_{recording}_{i}`.
    pub fn build(
        &self,
        recording_id: RecordingId,
        entities: &[Entity],
        relationships: &[Relationship],
        key_points: &[String],
    ) -> GraphFragment {
        let mut nodes: Vec<GraphNode> = entities
            .iter()
            .map(|entity| GraphNode {
                id: entity.key(),
                label: entity.text.trim().to_string(),
                node_type: entity.label.clone(),
                confidence: entity.confidence,
                recording_id,
                full_text: None,
            })
            .collect();

        nodes.extend(key_points.iter().enumerate().map(|(i, point)| GraphNode {
            id: key_point_id(recording_id, i),
            label: self.truncate_label(point),
            node_type: KEY_POINT_LABEL.to_string(),
            confidence: 1.0,
            recording_id,
            full_text: Some(point.clone()),
        }));

        let edges = relationships
            .iter()
            .map(|rel| GraphEdge {
                source: identity_key(&rel.source),
                target: identity_key(&rel.target),
                relationship: rel.relationship.clone(),
                confidence: rel.confidence,
                recording_id,
                context: rel.context.clone(),
            })
            .collect();

        GraphFragment {
            recording_id,
            nodes,
            edges,
        }
    }

    /// Upsert every node, then every edge whose endpoints exist.
    pub fn merge(store: &mut GraphStore, fragment: &GraphFragment) -> MergeStats {
        let mut stats = MergeStats::default();

        for node in &fragment.nodes {
            if store.upsert_node(node.clone()) {
                stats.nodes_added += 1;
            } else {
                stats.nodes_updated += 1;
            }
        }

        for edge in &fragment.edges {
            match store.upsert_edge(edge.clone()) {
                EdgeOutcome::Added => stats.edges_added += 1,
                EdgeOutcome::Updated => stats.edges_updated += 1,
                EdgeOutcome::Dropped => stats.edges_dropped += 1,
            }
        }

        debug!(
            "Merged recording {}: nodes +{} ~{}, edges +{} ~{} dropped {}",
            fragment.recording_id,
            stats.nodes_added,
            stats.nodes_updated,
            stats.edges_added,
            stats.edges_updated,
            stats.edges_dropped
        );

        stats
    }

    fn truncate_label(&self, point: &str) -> String {
        if point.chars().count() > self.key_point_label_chars {
            let head: String = point.chars().take(self.key_point_label_chars).collect();
            format!("{}...", head)
        } else {
            point.to_string()
        }
    }
}

pub fn key_point_id(recording_id: RecordingId, index: usize) -> String {
    format!("keypoint_{}_{}", recording_id, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexigraph_core::EntitySource;

    fn builder() -> GraphBuilder {
        GraphBuilder::new(&GraphLimits::default())
    }

    fn entity(text: &str, label: &str) -> Entity {
        Entity::new(text, label, 1.0, EntitySource::Local)
    }

    #[test]
    fn test_entity_nodes_keyed_by_identity() {
        let fragment = builder().build(7, &[entity("Machine Learning", "CONCEPT")], &[], &[]);
        let node = &fragment.nodes[0];
        assert_eq!(node.id, "machine learning");
        assert_eq!(node.label, "Machine Learning");
        assert_eq!(node.recording_id, 7);
    }

    #[test]
    fn test_case_variants_share_a_node() {
        let mut store = GraphStore::new();
        let b = builder();
        GraphBuilder::merge(&mut store, &b.build(1, &[entity("Budget", "CONCEPT")], &[], &[]));
        GraphBuilder::merge(&mut store, &b.build(1, &[entity("BUDGET", "ORG")], &[], &[]));
        assert_eq!(store.stats().total_nodes, 1);
        assert_eq!(store.node("budget").unwrap().label, "BUDGET");
    }

    #[test]
    fn test_key_point_nodes() {
        let long = "x".repeat(60);
        let points = vec!["Ship by Friday".to_string(), long.clone()];
        let fragment = builder().build(3, &[], &[], &points);

        assert_eq!(fragment.nodes[0].id, "keypoint_3_0");
        assert_eq!(fragment.nodes[0].label, "Ship by Friday");
        assert_eq!(fragment.nodes[0].node_type, KEY_POINT_LABEL);

        assert_eq!(fragment.nodes[1].id, "keypoint_3_1");
        assert_eq!(fragment.nodes[1].label, format!("{}...", "x".repeat(50)));
        assert_eq!(fragment.nodes[1].full_text.as_deref(), Some(long.as_str()));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let point = "é".repeat(50);
        let fragment = builder().build(1, &[], &[], &[point.clone()]);
        assert_eq!(fragment.nodes[0].label, point);
    }

    #[test]
    fn test_merge_drops_dangling_edges() {
        let mut store = GraphStore::new();
        let rels = vec![
            Relationship::new("Ada", "Graph", "discusses", 0.9),
            Relationship::new("Ada", "Nobody", "leads", 0.9),
        ];
        let fragment = builder().build(1, &[entity("Ada", "PERSON"), entity("Graph", "CONCEPT")], &rels, &[]);
        let stats = GraphBuilder::merge(&mut store, &fragment);

        assert_eq!(stats.nodes_added, 2);
        assert_eq!(stats.edges_added, 1);
        assert_eq!(stats.edges_dropped, 1);
        assert!(store.has_edge("ada", "graph"));
        assert_eq!(store.stats().total_edges, 1);
    }

    #[test]
    fn test_remerge_with_real_id_overwrites() {
        let mut store = GraphStore::new();
        let b = builder();
        let ents = [entity("Ada", "PERSON")];
        GraphBuilder::merge(&mut store, &b.build(0, &ents, &[], &["Point".to_string()]));
        let stats = GraphBuilder::merge(&mut store, &b.build(42, &ents, &[], &["Point".to_string()]));

        assert_eq!(stats.nodes_updated, 1);
        assert_eq!(stats.nodes_added, 1);
        assert_eq!(store.node("ada").unwrap().recording_id, 42);
        assert!(store.has_node("keypoint_0_0"));
        assert!(store.has_node("keypoint_42_0"));
    }
}

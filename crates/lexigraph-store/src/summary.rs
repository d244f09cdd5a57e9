//! Store statistics: type histograms and recording coverage.

use std::collections::{BTreeMap, BTreeSet};

use lexigraph_core::{RecordingId, PLACEHOLDER_RECORDING_ID};
use serde::{Deserialize, Serialize};

use crate::graph::GraphStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub total_entities: usize,
    pub total_relationships: usize,
    pub entity_types: BTreeMap<String, usize>,
    pub relationship_types: BTreeMap<String, usize>,
    /// Distinct recording ids among the counted nodes, placeholder excluded.
    pub recordings_covered: usize,
}

impl GraphStore {
    /// Summarize the nodes and edges of one recording, or of the whole store.
    pub fn summary(&self, recording_id: Option<RecordingId>) -> GraphSummary {
        let view = self.view(recording_id);

        let mut entity_types = BTreeMap::new();
        let mut recordings = BTreeSet::new();
        for node in &view.nodes {
            *entity_types.entry(node.node_type.clone()).or_insert(0) += 1;
            if node.recording_id != PLACEHOLDER_RECORDING_ID {
                recordings.insert(node.recording_id);
            }
        }

        let mut relationship_types = BTreeMap::new();
        for edge in &view.edges {
            *relationship_types.entry(edge.relationship.clone()).or_insert(0) += 1;
        }

        GraphSummary {
            total_entities: view.nodes.len(),
            total_relationships: view.edges.len(),
            entity_types,
            relationship_types,
            recordings_covered: recordings.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use lexigraph_core::{Entity, EntitySource, GraphLimits, Relationship};

    fn entity(text: &str, label: &str) -> Entity {
        Entity::new(text, label, 1.0, EntitySource::Remote)
    }

    fn merge(store: &mut GraphStore, recording_id: RecordingId, entities: &[Entity], rels: &[Relationship]) {
        let builder = GraphBuilder::new(&GraphLimits::default());
        GraphBuilder::merge(store, &builder.build(recording_id, entities, rels, &[]));
    }

    #[test]
    fn test_single_recording_summary() {
        let mut store = GraphStore::new();
        merge(
            &mut store,
            1,
            &[entity("Ada", "PERSON"), entity("Graph", "CONCEPT")],
            &[Relationship::new("Ada", "Graph", "discusses", 0.9)],
        );

        let summary = store.summary(Some(1));
        assert_eq!(summary.total_entities, 2);
        assert_eq!(summary.total_relationships, 1);
        assert_eq!(summary.entity_types.get("PERSON"), Some(&1));
        assert_eq!(summary.entity_types.get("CONCEPT"), Some(&1));
        assert_eq!(summary.relationship_types.get("discusses"), Some(&1));
        assert_eq!(summary.recordings_covered, 1);
    }

    #[test]
    fn test_shared_entity_last_write_wins() {
        let mut store = GraphStore::new();
        merge(&mut store, 1, &[entity("Budget", "CONCEPT")], &[]);
        merge(&mut store, 2, &[entity("Budget", "CONCEPT")], &[]);

        let all = store.summary(None);
        assert_eq!(all.total_entities, 1);
        assert_eq!(all.recordings_covered, 1);
        assert_eq!(store.summary(Some(1)).total_entities, 0);
        assert_eq!(store.summary(Some(2)).total_entities, 1);
    }

    #[test]
    fn test_distinct_recordings_counted() {
        let mut store = GraphStore::new();
        merge(&mut store, 1, &[entity("Budget", "CONCEPT"), entity("Ada", "PERSON")], &[]);
        merge(&mut store, 2, &[entity("Budget", "CONCEPT")], &[]);
        assert_eq!(store.summary(None).recordings_covered, 2);
    }

    #[test]
    fn test_placeholder_recording_not_covered() {
        let mut store = GraphStore::new();
        merge(&mut store, 0, &[entity("Ada", "PERSON")], &[]);
        let summary = store.summary(None);
        assert_eq!(summary.total_entities, 1);
        assert_eq!(summary.recordings_covered, 0);
    }

    #[test]
    fn test_summary_for_placeholder_covers_store() {
        let mut store = GraphStore::new();
        merge(&mut store, 1, &[entity("Ada", "PERSON")], &[]);
        merge(&mut store, 2, &[entity("Graph", "CONCEPT")], &[]);
        assert_eq!(store.summary(Some(0)), store.summary(None));
        assert_eq!(store.summary(Some(0)).recordings_covered, 2);
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(GraphStore::new().summary(None), GraphSummary::default());
    }
}

//! Query engine — label matching, shortest paths and neighbour expansion.

use lexigraph_core::{identity_key, recording_scope, GraphLimits, RecordingId, Result};
use lexigraph_extract::EntityExtractor;
use lexigraph_store::{GraphHandle, GraphNode, GraphStore};
use tracing::{debug, warn};

use crate::types::*;

/// Answers natural-language queries against the shared graph.
pub struct QueryEngine {
    extractor: EntityExtractor,
    limits: GraphLimits,
}

impl QueryEngine {
    pub fn new(extractor: EntityExtractor, limits: GraphLimits) -> Self {
        Self { extractor, limits }
    }

    /// Resolve `text` against the graph, optionally scoping node matching
    /// to one recording. Never fails; errors yield the empty result.
    pub async fn query(
        &self,
        graph: &GraphHandle,
        text: &str,
        recording_id: Option<RecordingId>,
    ) -> QueryResult {
        let terms = self.query_terms(text).await;
        debug!("Query {:?} reduced to terms {:?}", text, terms);

        let store = graph.read();
        self.resolve(&store, &terms, recording_id).unwrap_or_else(|e| {
            warn!("Graph query failed: {}", e);
            QueryResult::default()
        })
    }

    /// Lower-cased texts of the entities found in the query.
    pub async fn query_terms(&self, text: &str) -> Vec<String> {
        self.extractor
            .extract(text)
            .await
            .into_iter()
            .map(|entity| entity.key())
            .collect()
    }

    /// Match, connect and expand `terms` against a locked store.
    pub fn resolve(
        &self,
        store: &GraphStore,
        terms: &[String],
        recording_id: Option<RecordingId>,
    ) -> Result<QueryResult> {
        let scope = recording_scope(recording_id);
        let matched: Vec<&GraphNode> = store
            .nodes()
            .filter(|node| scope.map_or(true, |rid| node.recording_id == rid))
            .filter(|node| label_matches(&node.label, terms))
            .take(self.limits.max_relevant_nodes)
            .collect();

        let paths = self.paths_between(store, &matched)?;
        let related_concepts = self.related_concepts(store, terms);

        let relevant_nodes = matched
            .into_iter()
            .map(|node| RelevantNode {
                id: node.id.clone(),
                label: node.label.clone(),
                node_type: node.node_type.clone(),
                confidence: node.confidence,
            })
            .collect();

        Ok(QueryResult {
            relevant_nodes,
            paths,
            related_concepts,
            graph_stats: store.stats(),
        })
    }

    /// Shortest directed path for each pair of matched nodes, in pair order.
    fn paths_between(&self, store: &GraphStore, matched: &[&GraphNode]) -> Result<Vec<Vec<String>>> {
        let mut paths = Vec::new();
        for (i, from) in matched.iter().enumerate() {
            for to in &matched[i + 1..] {
                if paths.len() >= self.limits.max_paths {
                    return Ok(paths);
                }
                if let Some(path) = store.shortest_path(&from.id, &to.id)? {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }

    /// Direct neighbours of every term that names a store node.
    ///
    /// Nodes are visited once each in store order, regardless of recording;
    /// a node is reported when it touches any such term.
    fn related_concepts(&self, store: &GraphStore, terms: &[String]) -> Vec<RelatedConcept> {
        let keys: Vec<String> = terms
            .iter()
            .map(|term| identity_key(term))
            .filter(|key| store.has_node(key))
            .collect();
        if keys.is_empty() {
            return Vec::new();
        }

        store
            .nodes()
            .filter(|node| keys.iter().any(|key| store.is_adjacent(key, &node.id)))
            .take(self.limits.max_related_concepts)
            .map(|node| RelatedConcept {
                concept: node.label.clone(),
                node_type: node.node_type.clone(),
                connection: Connection::Direct,
            })
            .collect()
    }
}

/// Bidirectional substring containment against the lower-cased label.
fn label_matches(label: &str, terms: &[String]) -> bool {
    let label = label.to_lowercase();
    terms
        .iter()
        .filter(|term| !term.is_empty())
        .any(|term| label.contains(term.as_str()) || term.contains(label.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lexigraph_core::{Entity, EntitySource, Relationship};
    use lexigraph_extract::HeuristicAnnotator;
    use lexigraph_llm::{CompletionBackend, MockBackend};
    use lexigraph_store::GraphBuilder;

    fn annotator_engine() -> QueryEngine {
        let extractor = EntityExtractor::new(
            Some(Arc::new(HeuristicAnnotator::new())),
            None,
            GraphLimits::default(),
        );
        QueryEngine::new(extractor, GraphLimits::default())
    }

    /// Engine whose query terms are exactly `terms`, via a scripted model reply.
    fn scripted_engine(terms: &[&str]) -> QueryEngine {
        let reply: Vec<serde_json::Value> = terms
            .iter()
            .map(|t| serde_json::json!({"text": t, "type": "CONCEPT"}))
            .collect();
        let backend = Arc::new(MockBackend::with_replies([serde_json::to_string(&reply).unwrap()]));
        let extractor = EntityExtractor::new(
            None,
            Some(backend as Arc<dyn CompletionBackend>),
            GraphLimits::default(),
        );
        QueryEngine::new(extractor, GraphLimits::default())
    }

    fn entity(text: &str, label: &str) -> Entity {
        Entity::new(text, label, 1.0, EntitySource::Local)
    }

    fn graph_with(recording_id: RecordingId, entities: &[Entity], rels: &[Relationship]) -> GraphHandle {
        let handle = GraphStore::new().into_handle();
        add(&handle, recording_id, entities, rels);
        handle
    }

    fn add(handle: &GraphHandle, recording_id: RecordingId, entities: &[Entity], rels: &[Relationship]) {
        let fragment = GraphBuilder::new(&GraphLimits::default()).build(recording_id, entities, rels, &[]);
        GraphBuilder::merge(&mut handle.write(), &fragment);
    }

    fn labels(result: &QueryResult) -> Vec<&str> {
        result.relevant_nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[tokio::test]
    async fn test_query_finds_node_and_neighbour() {
        let graph = graph_with(
            1,
            &[entity("Ada", "PERSON"), entity("Graph", "CONCEPT")],
            &[Relationship::new("Ada", "Graph", "discusses", 0.9)],
        );

        let result = annotator_engine().query(&graph, "Ada", None).await;

        assert_eq!(labels(&result), vec!["Ada"]);
        assert_eq!(result.relevant_nodes[0].node_type, "PERSON");
        assert_eq!(result.related_concepts.len(), 1);
        assert_eq!(result.related_concepts[0].concept, "Graph");
        assert_eq!(result.related_concepts[0].connection, Connection::Direct);
        assert!(result.paths.is_empty());
        assert_eq!(result.graph_stats.total_nodes, 2);
        assert_eq!(result.graph_stats.total_edges, 1);
    }

    #[tokio::test]
    async fn test_neighbour_found_against_edge_direction() {
        let graph = graph_with(
            1,
            &[entity("Ada", "PERSON"), entity("Graph", "CONCEPT")],
            &[Relationship::new("Ada", "Graph", "discusses", 0.9)],
        );
        let result = scripted_engine(&["Graph"]).query(&graph, "graph?", None).await;
        let concepts: Vec<&str> = result.related_concepts.iter().map(|c| c.concept.as_str()).collect();
        assert_eq!(concepts, vec!["Ada"]);
    }

    #[tokio::test]
    async fn test_term_inside_label_matches() {
        let graph = graph_with(
            1,
            &[entity("Machine Learning", "CONCEPT"), entity("ML", "CONCEPT"), entity("Deep Learning", "CONCEPT")],
            &[],
        );
        let result = scripted_engine(&["learning"]).query(&graph, "learning", None).await;
        assert_eq!(labels(&result), vec!["Machine Learning", "Deep Learning"]);
    }

    #[tokio::test]
    async fn test_label_inside_term_matches() {
        let graph = graph_with(
            1,
            &[entity("Machine Learning", "CONCEPT"), entity("ML", "CONCEPT"), entity("Deep Learning", "CONCEPT")],
            &[],
        );
        let result = scripted_engine(&["ML systems"]).query(&graph, "ML systems", None).await;
        assert_eq!(labels(&result), vec!["ML"]);
    }

    #[tokio::test]
    async fn test_token_overlap_is_not_a_match() {
        let graph = graph_with(1, &[entity("Deep Learning", "CONCEPT")], &[]);
        let result = scripted_engine(&["learning systems"]).query(&graph, "q", None).await;
        assert!(result.relevant_nodes.is_empty());
        assert_eq!(result.graph_stats.total_nodes, 1);
    }

    #[tokio::test]
    async fn test_paths_follow_pair_order_and_direction() {
        let graph = graph_with(
            1,
            &[entity("Node A", "CONCEPT"), entity("Node B", "CONCEPT"), entity("Node C", "CONCEPT")],
            &[
                Relationship::new("Node B", "Node C", "leads", 0.9),
                Relationship::new("Node A", "Node B", "leads", 0.9),
            ],
        );
        let result = scripted_engine(&["node"]).query(&graph, "node", None).await;

        assert_eq!(
            result.paths,
            vec![
                vec!["node a".to_string(), "node b".to_string()],
                vec!["node a".to_string(), "node b".to_string(), "node c".to_string()],
                vec!["node b".to_string(), "node c".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_result_caps() {
        let names: Vec<String> = (0..12).map(|i| format!("Topic {:02}", i)).collect();
        let entities: Vec<Entity> = names.iter().map(|n| entity(n, "CONCEPT")).collect();
        let mut rels = Vec::new();
        for pair in names.windows(2) {
            rels.push(Relationship::new(&pair[0], &pair[1], "leads", 0.9));
        }
        let graph = graph_with(1, &entities, &rels);

        let result = scripted_engine(&["topic"]).query(&graph, "topic", None).await;
        assert_eq!(result.relevant_nodes.len(), 10);
        assert_eq!(result.paths.len(), 5);
        assert_eq!(result.relevant_nodes[0].label, "Topic 00");
    }

    #[tokio::test]
    async fn test_related_concepts_capped_and_unique() {
        let hub = entity("Hub", "CONCEPT");
        let spokes: Vec<Entity> = (0..12).map(|i| entity(&format!("Spoke{}", i), "CONCEPT")).collect();
        let mut entities = vec![hub];
        entities.extend(spokes.iter().cloned());
        let mut rels: Vec<Relationship> = spokes
            .iter()
            .map(|s| Relationship::new("Hub", &s.text, "leads", 0.9))
            .collect();
        rels.push(Relationship::new("Spoke0", "Hub", "causes", 0.9));
        let graph = graph_with(1, &entities, &rels);

        let result = scripted_engine(&["hub"]).query(&graph, "hub", None).await;
        assert_eq!(result.related_concepts.len(), 10);
        assert_eq!(result.related_concepts[0].concept, "Spoke0");
        assert_eq!(result.related_concepts[1].concept, "Spoke1");
    }

    #[tokio::test]
    async fn test_related_concepts_follow_store_order_across_terms() {
        let graph = graph_with(
            1,
            &[
                entity("Xray", "CONCEPT"),
                entity("Yankee", "CONCEPT"),
                entity("Tango", "CONCEPT"),
                entity("Uniform", "CONCEPT"),
            ],
            &[
                Relationship::new("Uniform", "Xray", "leads", 0.9),
                Relationship::new("Tango", "Yankee", "leads", 0.9),
            ],
        );

        let result = scripted_engine(&["tango", "uniform"]).query(&graph, "q", None).await;
        let concepts: Vec<&str> = result.related_concepts.iter().map(|c| c.concept.as_str()).collect();
        assert_eq!(concepts, vec!["Xray", "Yankee"]);
    }

    #[tokio::test]
    async fn test_node_touching_two_terms_reported_once() {
        let graph = graph_with(
            1,
            &[entity("Alpha", "CONCEPT"), entity("Beta", "CONCEPT"), entity("Shared", "CONCEPT")],
            &[
                Relationship::new("Alpha", "Shared", "leads", 0.9),
                Relationship::new("Beta", "Shared", "leads", 0.9),
            ],
        );

        let result = scripted_engine(&["alpha", "beta"]).query(&graph, "q", None).await;
        let concepts: Vec<&str> = result.related_concepts.iter().map(|c| c.concept.as_str()).collect();
        assert_eq!(concepts, vec!["Shared"]);
    }

    #[tokio::test]
    async fn test_placeholder_recording_is_unscoped() {
        let graph = graph_with(1, &[entity("Ada", "PERSON")], &[]);
        add(&graph, 2, &[entity("Adapter", "CONCEPT")], &[]);

        let result = scripted_engine(&["ada"]).query(&graph, "ada", Some(0)).await;
        assert_eq!(labels(&result), vec!["Ada", "Adapter"]);
    }

    #[tokio::test]
    async fn test_recording_scope_limits_matches_only() {
        let graph = graph_with(
            1,
            &[entity("Ada", "PERSON"), entity("Graph", "CONCEPT")],
            &[Relationship::new("Ada", "Graph", "discusses", 0.9)],
        );
        add(&graph, 2, &[entity("Adapter", "CONCEPT")], &[]);

        let result = scripted_engine(&["ada"]).query(&graph, "ada", Some(2)).await;
        assert_eq!(labels(&result), vec!["Adapter"]);
        assert_eq!(result.related_concepts[0].concept, "Graph");
        assert_eq!(result.graph_stats.total_nodes, 3);
    }

    #[tokio::test]
    async fn test_failed_extraction_gives_empty_matches() {
        let graph = graph_with(1, &[entity("Ada", "PERSON")], &[]);
        let backend = Arc::new(MockBackend::failing("offline"));
        let extractor = EntityExtractor::new(None, Some(backend as Arc<dyn CompletionBackend>), GraphLimits::default());
        let engine = QueryEngine::new(extractor, GraphLimits::default());

        let result = engine.query(&graph, "Ada", None).await;
        assert!(result.relevant_nodes.is_empty());
        assert!(result.related_concepts.is_empty());
        assert_eq!(result.graph_stats.total_nodes, 1);
    }

    #[test]
    fn test_empty_result_serializes_full_shape() {
        let json = serde_json::to_value(QueryResult::default()).unwrap();
        assert_eq!(json["relevant_nodes"], serde_json::json!([]));
        assert_eq!(json["paths"], serde_json::json!([]));
        assert_eq!(json["related_concepts"], serde_json::json!([]));
        assert_eq!(json["graph_stats"]["total_nodes"], 0);
    }
}

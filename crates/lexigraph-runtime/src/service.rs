//! Knowledge graph service — one entry point per recording-level operation.

use std::sync::Arc;

use chrono::Utc;
use lexigraph_core::{GraphLimits, RecordingId};
use lexigraph_extract::{EntityExtractor, LinguisticAnnotator, RelationshipExtractor};
use lexigraph_llm::CompletionBackend;
use lexigraph_resolve::{QueryEngine, QueryResult};
use lexigraph_store::{GraphBuilder, GraphHandle, GraphStats, GraphSummary};
use tracing::info;

use crate::types::*;

/// Owns the extraction pipeline and a handle to the shared graph.
pub struct KnowledgeGraphService {
    graph: GraphHandle,
    entities: EntityExtractor,
    relationships: RelationshipExtractor,
    builder: GraphBuilder,
    query_engine: QueryEngine,
}

impl KnowledgeGraphService {
    pub fn new(
        graph: GraphHandle,
        annotator: Option<Arc<dyn LinguisticAnnotator>>,
        backend: Option<Arc<dyn CompletionBackend>>,
        limits: GraphLimits,
    ) -> Self {
        let entities = EntityExtractor::new(annotator, backend.clone(), limits.clone());
        let relationships = RelationshipExtractor::new(backend, limits.clone());
        let builder = GraphBuilder::new(&limits);
        let query_engine = QueryEngine::new(entities.clone(), limits);

        info!(
            "Knowledge graph service ready (local={}, remote={})",
            entities.has_annotator(),
            entities.has_backend()
        );

        Self {
            graph,
            entities,
            relationships,
            builder,
            query_engine,
        }
    }

    /// Extract entities and relationships from a recording and merge them
    /// into the graph.
    ///
    /// Entities come from the transcript and summary together, relationships
    /// from the transcript alone. Rebuilding under a real id after a
    /// placeholder build overwrites the entity nodes' recording.
    pub async fn build_knowledge_graph(
        &self,
        recording_id: RecordingId,
        transcript: &str,
        summary: &str,
        key_points: &[String],
    ) -> BuildReport {
        let combined = format!("{} {}", transcript, summary);
        let entities = self.entities.extract(&combined).await;
        let relationships = self.relationships.extract(transcript, &entities).await;

        let fragment = self
            .builder
            .build(recording_id, &entities, &relationships, key_points);
        let merge = GraphBuilder::merge(&mut self.graph.write(), &fragment);

        info!(
            "Built knowledge graph for recording {}: {} entities, {} relationships, {} key points",
            recording_id,
            entities.len(),
            relationships.len(),
            key_points.len()
        );

        BuildReport {
            recording_id,
            entities,
            relationships,
            graph_data: fragment,
            merge,
            built_at: Utc::now(),
        }
    }

    /// Build from an upstream payload.
    pub async fn build_recording(&self, input: &RecordingInput) -> BuildReport {
        self.build_knowledge_graph(
            input.recording_id,
            &input.transcript,
            &input.summary,
            &input.key_points,
        )
        .await
    }

    pub async fn query(&self, text: &str, recording_id: Option<RecordingId>) -> QueryResult {
        self.query_engine.query(&self.graph, text, recording_id).await
    }

    /// Nodes and edges of one recording, or of the whole store, with summary.
    pub fn graph(&self, recording_id: Option<RecordingId>) -> RecordingGraph {
        let store = self.graph.read();
        RecordingGraph {
            graph_data: store.view(recording_id),
            summary: store.summary(recording_id),
        }
    }

    pub fn summary(&self, recording_id: Option<RecordingId>) -> GraphSummary {
        self.graph.read().summary(recording_id)
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.read().stats()
    }
}

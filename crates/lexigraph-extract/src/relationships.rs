//! Relationship extraction: sentence co-occurrence plus remote semantic edges.

use std::sync::Arc;

use lexigraph_core::{
    Entity, ExtractionError, GraphLimits, Relationship, MENTIONED_TOGETHER, RELATIONSHIP_TYPES,
};
use lexigraph_llm::{CompletionBackend, CompletionRequest};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dedup::dedupe_relationships;
use crate::json::parse_json_array;
use crate::{char_prefix, prompts};

/// Relationship as the remote model reports it.
#[derive(Debug, Deserialize)]
struct RawRelationship {
    source: String,
    target: String,
    relationship: String,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Derives directed edges between already-extracted entities.
#[derive(Clone)]
pub struct RelationshipExtractor {
    backend: Option<Arc<dyn CompletionBackend>>,
    limits: GraphLimits,
}

impl RelationshipExtractor {
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>, limits: GraphLimits) -> Self {
        Self { backend, limits }
    }

    /// Co-occurrence and remote relationships, deduplicated. Never fails.
    pub async fn extract(&self, text: &str, entities: &[Entity]) -> Vec<Relationship> {
        let mut relationships = self.cooccurrence(text, entities);

        let names: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        match self.remote_relationships(text, &names).await {
            Ok(remote) => relationships.extend(remote),
            Err(ExtractionError::BackendUnavailable) => {}
            Err(e) => warn!("Remote relationship extraction failed: {}", e),
        }

        let unique = dedupe_relationships(relationships);
        debug!("Extracted {} relationships", unique.len());
        unique
    }

    /// One `mentioned_together` edge per pair of entities sharing a sentence.
    ///
    /// Sentences are split on every period. Within a sentence, pairs follow
    /// the order of `entities`, so only (A, B) is emitted for A listed before B.
    pub fn cooccurrence(&self, text: &str, entities: &[Entity]) -> Vec<Relationship> {
        let needles: Vec<(&str, String)> = entities
            .iter()
            .map(|e| (e.text.as_str(), e.text.to_lowercase()))
            .filter(|(_, lower)| !lower.trim().is_empty())
            .collect();

        let mut relationships = Vec::new();
        for sentence in text.split('.') {
            let lower = sentence.to_lowercase();
            let present: Vec<&str> = needles
                .iter()
                .filter(|(_, needle)| lower.contains(needle.as_str()))
                .map(|(text, _)| *text)
                .collect();

            for (i, source) in present.iter().enumerate() {
                for target in &present[i + 1..] {
                    relationships.push(
                        Relationship::new(
                            *source,
                            *target,
                            MENTIONED_TOGETHER,
                            self.limits.cooccurrence_confidence,
                        )
                        .with_context(sentence.trim()),
                    );
                }
            }
        }
        relationships
    }

    /// Ask the language model for typed relationships among `entities`.
    ///
    /// Skipped with no call when fewer than two entities are known. Types
    /// outside the allowed vocabulary are dropped.
    pub async fn remote_relationships(
        &self,
        text: &str,
        entities: &[&str],
    ) -> Result<Vec<Relationship>, ExtractionError> {
        if entities.len() < 2 {
            return Ok(Vec::new());
        }
        let backend = self.backend.as_ref().ok_or(ExtractionError::BackendUnavailable)?;

        let listed = &entities[..entities.len().min(self.limits.max_prompt_entities)];
        let excerpt = char_prefix(text, self.limits.relationship_prompt_chars);
        let request = CompletionRequest::new(
            prompts::RELATIONSHIP_SYSTEM,
            prompts::relationship_prompt(listed, excerpt),
        )
        .with_max_tokens(600)
        .with_temperature(0.3);

        let reply = backend
            .complete(request)
            .await
            .map_err(|e| ExtractionError::Backend(e.to_string()))?;
        let raw: Vec<RawRelationship> = parse_json_array(&reply)?;

        Ok(raw
            .into_iter()
            .filter_map(|r| {
                let kind = r.relationship.trim().to_lowercase();
                if !RELATIONSHIP_TYPES.contains(&kind.as_str()) {
                    debug!("Dropping relationship of unknown type {:?}", r.relationship);
                    return None;
                }
                if r.source.trim().is_empty() || r.target.trim().is_empty() {
                    return None;
                }
                let confidence = r.confidence.unwrap_or(self.limits.default_remote_confidence);
                Some(Relationship::new(r.source, r.target, kind, confidence))
            })
            .collect())
    }
}

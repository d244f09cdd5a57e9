//! Entity extraction: local annotator + remote language model, deduplicated.

use std::sync::Arc;

use lexigraph_core::{Entity, EntitySource, ExtractionError, GraphLimits};
use lexigraph_llm::{CompletionBackend, CompletionRequest};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::annotate::LinguisticAnnotator;
use crate::dedup::dedupe_entities;
use crate::json::parse_json_array;
use crate::{char_prefix, prompts};

const LOCAL_CONFIDENCE: f64 = 1.0;

/// Entity as the remote model reports it.
#[derive(Debug, Deserialize)]
struct RawEntity {
    text: String,
    #[serde(rename = "type", default = "default_label")]
    label: String,
    #[serde(default)]
    importance: Option<f64>,
}

fn default_label() -> String {
    "CONCEPT".into()
}

/// Extracts entities with every available strategy and merges the results.
///
/// Either strategy may be absent. A missing or failing strategy contributes
/// nothing; extraction itself never fails.
#[derive(Clone)]
pub struct EntityExtractor {
    annotator: Option<Arc<dyn LinguisticAnnotator>>,
    backend: Option<Arc<dyn CompletionBackend>>,
    limits: GraphLimits,
}

impl EntityExtractor {
    pub fn new(
        annotator: Option<Arc<dyn LinguisticAnnotator>>,
        backend: Option<Arc<dyn CompletionBackend>>,
        limits: GraphLimits,
    ) -> Self {
        Self {
            annotator,
            backend,
            limits,
        }
    }

    pub fn has_annotator(&self) -> bool {
        self.annotator.is_some()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Extract and deduplicate entities from `text`.
    pub async fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities = self.local_entities(text).unwrap_or_else(|e| {
            warn!("Local entity extraction failed: {}", e);
            Vec::new()
        });

        match self.remote_entities(text).await {
            Ok(remote) => entities.extend(remote),
            Err(ExtractionError::BackendUnavailable) => {}
            Err(e) => warn!("Remote entity extraction failed: {}", e),
        }

        let merged = dedupe_entities(entities);
        debug!("Extracted {} entities", merged.len());
        merged
    }

    /// One entity per annotated span, tagged as local.
    pub fn local_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError> {
        let Some(annotator) = &self.annotator else {
            return Ok(Vec::new());
        };
        let spans = annotator.annotate(text)?;
        debug!("Annotator {} found {} spans", annotator.name(), spans.len());
        Ok(spans
            .into_iter()
            .map(|span| Entity::new(span.text, span.label, LOCAL_CONFIDENCE, EntitySource::Local))
            .collect())
    }

    /// Ask the language model for entities in a prefix of `text`.
    pub async fn remote_entities(&self, text: &str) -> Result<Vec<Entity>, ExtractionError> {
        let backend = self.backend.as_ref().ok_or(ExtractionError::BackendUnavailable)?;

        let excerpt = char_prefix(text, self.limits.entity_prompt_chars);
        let request = CompletionRequest::new(prompts::ENTITY_SYSTEM, prompts::entity_prompt(excerpt))
            .with_max_tokens(800)
            .with_temperature(0.3);

        let reply = backend
            .complete(request)
            .await
            .map_err(|e| ExtractionError::Backend(e.to_string()))?;
        let raw: Vec<RawEntity> = parse_json_array(&reply)?;

        Ok(raw
            .into_iter()
            .map(|r| {
                let confidence = r.importance.unwrap_or(self.limits.default_remote_confidence);
                Entity::new(r.text, r.label, confidence, EntitySource::Remote)
            })
            .collect())
    }
}

//! Extraction data model: entities, relationships and their identity keys.

use serde::{Deserialize, Serialize};

/// Opaque handle of a recording, assigned by persistence outside this crate.
pub type RecordingId = i64;

/// Id used before the recording has been persisted.
pub const PLACEHOLDER_RECORDING_ID: RecordingId = 0;

/// Scope filter for reads. The placeholder id names no recording, so it
/// scopes nothing.
pub fn recording_scope(recording_id: Option<RecordingId>) -> Option<RecordingId> {
    recording_id.filter(|&rid| rid != PLACEHOLDER_RECORDING_ID)
}

/// Type tag of key-point nodes.
pub const KEY_POINT_LABEL: &str = "KEY_POINT";

/// Relationship type of sentence co-occurrence edges.
pub const MENTIONED_TOGETHER: &str = "mentioned_together";

/// Relationship types the remote extractor may produce.
pub const RELATIONSHIP_TYPES: &[&str] = &[
    "discusses",
    "leads",
    "depends_on",
    "part_of",
    "causes",
    "results_in",
    "collaborates_with",
];

/// Normalized identity of an entity name: trimmed and lower-cased.
pub fn identity_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Which extraction strategy produced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitySource {
    /// Local linguistic annotator.
    Local,
    /// Remote language model. Its labels win on merge.
    Remote,
}

impl std::fmt::Display for EntitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// A named concept, person, organization, date or action found in text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    /// Free-form category tag (PERSON, ORG, CONCEPT, ...).
    pub label: String,
    pub confidence: f64,
    pub source: EntitySource,
}

impl Entity {
    pub fn new(
        text: impl Into<String>,
        label: impl Into<String>,
        confidence: f64,
        source: EntitySource,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
            source,
        }
    }

    pub fn key(&self) -> String {
        identity_key(&self.text)
    }
}

/// A directed, typed association between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub relationship: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
            confidence: confidence.clamp(0.0, 1.0),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Identity: direction and type both participate.
    pub fn key(&self) -> (String, String, String) {
        (
            identity_key(&self.source),
            identity_key(&self.target),
            self.relationship.trim().to_lowercase(),
        )
    }
}

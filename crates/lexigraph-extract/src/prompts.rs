//! Prompts for the remote extraction strategies.

use lexigraph_core::RELATIONSHIP_TYPES;

pub const JSON_ONLY: &str = "Return valid JSON only, with no commentary.";

pub const ENTITY_SYSTEM: &str =
    "You extract entities from meeting and lecture transcripts. Return valid JSON only.";

pub const RELATIONSHIP_SYSTEM: &str =
    "You extract semantic relationships between known entities. Return valid JSON only.";

pub fn entity_prompt(excerpt: &str) -> String {
    format!(
        r#"Extract the important entities from this meeting or lecture transcript:
- key concepts and topics
- people and organizations
- products, projects and initiatives
- dates and deadlines
- action items and decisions

Text: {excerpt}...

Answer with a JSON array shaped like:
[{{"text": "entity name", "type": "CONCEPT|PERSON|ORG|DATE|ACTION", "importance": 0.0}}]
where importance is between 0.0 and 1.0.

{JSON_ONLY}"#
    )
}

pub fn relationship_prompt(entities: &[&str], excerpt: &str) -> String {
    format!(
        r#"Entities mentioned in a meeting or lecture: {entities}

Find the meaningful relationships between these entities in this text: {excerpt}...

Answer with a JSON array shaped like:
[{{"source": "entity1", "target": "entity2", "relationship": "relationship_type", "confidence": 0.0}}]

Allowed relationship types: {types}

{JSON_ONLY}"#,
        entities = entities.join(", "),
        types = RELATIONSHIP_TYPES.join(", "),
    )
}

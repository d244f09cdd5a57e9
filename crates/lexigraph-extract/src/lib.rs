//! Lexigraph Extract — entities and relationships from unstructured text.
//!
//! Two strategies run side by side: a local linguistic annotator and a
//! remote language model. Their outputs are merged by the deduplicators.
//! Every strategy failure degrades to an empty contribution.

pub mod annotate;
pub mod dedup;
pub mod entities;
pub mod json;
mod prompts;
pub mod relationships;

pub use annotate::{HeuristicAnnotator, LinguisticAnnotator, Span};
pub use dedup::{dedupe_entities, dedupe_relationships};
pub use entities::EntityExtractor;
pub use relationships::RelationshipExtractor;

/// Longest prefix of `text` holding at most `max_chars` characters.
pub(crate) fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

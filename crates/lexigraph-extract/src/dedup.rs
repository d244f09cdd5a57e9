//! Merging of extraction outputs into canonical entity and relationship sets.

use std::collections::{HashMap, HashSet};

use lexigraph_core::{Entity, EntitySource, Relationship};

/// Collapse entities sharing an identity key.
///
/// The first entity seen for a key fixes its text and position. Later
/// duplicates raise the confidence to the maximum seen, and a remote
/// duplicate replaces the label. Entities with a blank key are dropped.
pub fn dedupe_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut merged: Vec<Entity> = Vec::with_capacity(entities.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for entity in entities {
        let key = entity.key();
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut merged[i];
                existing.confidence = existing.confidence.max(entity.confidence);
                if entity.source == EntitySource::Remote {
                    existing.label = entity.label;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(entity);
            }
        }
    }

    merged
}

/// Keep the first relationship for each (source, target, type) key.
pub fn dedupe_relationships(relationships: Vec<Relationship>) -> Vec<Relationship> {
    let mut seen = HashSet::new();
    relationships
        .into_iter()
        .filter(|rel| seen.insert(rel.key()))
        .collect()
}

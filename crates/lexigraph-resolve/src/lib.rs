//! Query resolution — natural-language questions against the knowledge graph.
//!
//! A query is reduced to entity terms with the same extraction pipeline used
//! for recordings, then matched against node labels, connected by shortest
//! paths and expanded to direct neighbours.

pub mod engine;
pub mod types;

pub use engine::QueryEngine;
pub use types::*;

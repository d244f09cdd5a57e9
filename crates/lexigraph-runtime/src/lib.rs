//! Runtime service — composes extraction, the graph store and the query
//! engine into the operations exposed to the outer HTTP layer.

pub mod service;
pub mod types;

pub use service::KnowledgeGraphService;
pub use types::*;

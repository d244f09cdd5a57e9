//! Lexigraph Store — multi-recording knowledge graph on petgraph.

pub mod builder;
pub mod graph;
pub mod summary;

pub use builder::{GraphBuilder, GraphFragment, MergeStats};
pub use graph::{EdgeOutcome, GraphEdge, GraphHandle, GraphNode, GraphStats, GraphStore, GraphView};
pub use summary::GraphSummary;

//! Lexigraph Core — data model, error taxonomy, configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::{DataPaths, GraphLimits, LexigraphConfig};
pub use error::{Error, ExtractionError, Result};
pub use types::*;

//! Error types for Lexigraph.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one extraction strategy.
///
/// Never surfaces past an extractor's public API: the extractor logs it and
/// contributes an empty result instead.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("No completion backend configured")]
    BackendUnavailable,

    #[error("Completion backend failed: {0}")]
    Backend(String),

    #[error("Unparsable reply: {0}")]
    Parse(String),

    #[error("Annotator failed: {0}")]
    Annotator(String),
}

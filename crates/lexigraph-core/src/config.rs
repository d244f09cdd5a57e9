//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 3010;

/// Paths to the Lexigraph data directory and its files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the root if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            llm_config_file: root.join("llm-config.json"),
            root,
        })
    }
}

/// Numeric limits applied by the extractors, builder and query engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLimits {
    /// Characters of text sent to the remote entity extractor.
    pub entity_prompt_chars: usize,
    /// Characters of text sent to the remote relationship extractor.
    pub relationship_prompt_chars: usize,
    /// Entity names listed in the relationship prompt.
    pub max_prompt_entities: usize,
    /// Confidence assigned to sentence co-occurrence edges.
    pub cooccurrence_confidence: f64,
    /// Confidence for remote items that omit one.
    pub default_remote_confidence: f64,
    /// Key-point labels longer than this are truncated.
    pub key_point_label_chars: usize,
    pub max_relevant_nodes: usize,
    pub max_paths: usize,
    pub max_related_concepts: usize,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            entity_prompt_chars: 2000,
            relationship_prompt_chars: 1500,
            max_prompt_entities: 20,
            cooccurrence_confidence: 0.7,
            default_remote_confidence: 0.5,
            key_point_label_chars: 50,
            max_relevant_nodes: 10,
            max_paths: 5,
            max_related_concepts: 10,
        }
    }
}

/// Top-level Lexigraph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexigraphConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    pub limits: GraphLimits,
}

impl LexigraphConfig {
    /// Create configuration from environment and defaults.
    ///
    /// A `PORT` that is set but not a valid port number is an error.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            port,
            data_paths,
            limits: GraphLimits::default(),
        })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse()
            .map_err(|_| Error::Config(format!("invalid PORT: {value:?}"))),
    }
}

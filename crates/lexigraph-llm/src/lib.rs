//! Language-model completion collaborator (OpenAI/Anthropic/Groq).
//!
//! Extraction only needs single-shot completions, so every provider is
//! reached through the [`CompletionBackend`] trait. Tests script replies
//! with [`MockBackend`].

pub mod backend;
pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use backend::{CompletionBackend, MockBackend};
pub use config::{LLMConfig, ProviderPreference, ProviderSettings};
pub use error::{LlmError, Result};
pub use providers::HttpBackend;
pub use types::*;

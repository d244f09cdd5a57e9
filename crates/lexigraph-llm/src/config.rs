//! LLM configuration loading and provider selection.
//!
//! `llm-config.json` looks like:
//!
//! ```json
//! {
//!   "preferred_provider": "auto",
//!   "anthropic": { "api_key": "sk-ant-...", "model": "claude-3-5-haiku-20241022" },
//!   "groq": { "api_key": null },
//!   "openai": { "model": "gpt-4o-mini" }
//! }
//! ```
//!
//! Every field is optional. Missing keys are read from the provider's
//! environment variable.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::LLMProvider;

/// Provider choice; `Auto` takes the first configured one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPreference {
    #[default]
    Auto,
    OpenAI,
    Anthropic,
    Groq,
}

/// Key and model for one provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overrides the provider's default model.
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default)]
    pub preferred_provider: ProviderPreference,
    #[serde(default)]
    pub openai: ProviderSettings,
    #[serde(default)]
    pub anthropic: ProviderSettings,
    #[serde(default)]
    pub groq: ProviderSettings,
}

impl LLMConfig {
    /// Read `config_path`, then fill missing keys from the environment.
    pub fn load(config_path: &Path) -> Self {
        let mut config = Self::load_file(config_path);

        for provider in LLMProvider::AUTO_ORDER {
            let settings = config.settings_mut(provider);
            if settings.api_key.is_none() {
                settings.api_key = std::env::var(provider.api_key_env()).ok();
            }
        }

        match config.resolve_provider() {
            Some((provider, model, _)) => info!("LLM provider: {} ({})", provider, model),
            None => info!("No LLM provider configured; remote extraction disabled"),
        }

        config
    }

    fn load_file(config_path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(config_path) else {
            return Self::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!("Ignoring malformed {}: {}", config_path.display(), e);
            Self::default()
        })
    }

    pub fn settings(&self, provider: LLMProvider) -> &ProviderSettings {
        match provider {
            LLMProvider::OpenAI => &self.openai,
            LLMProvider::Anthropic => &self.anthropic,
            LLMProvider::Groq => &self.groq,
        }
    }

    fn settings_mut(&mut self, provider: LLMProvider) -> &mut ProviderSettings {
        match provider {
            LLMProvider::OpenAI => &mut self.openai,
            LLMProvider::Anthropic => &mut self.anthropic,
            LLMProvider::Groq => &mut self.groq,
        }
    }

    /// Provider, model and key to use, or `None` when no usable key is set.
    ///
    /// An explicit preference without a key resolves to nothing rather than
    /// falling through to another provider.
    pub fn resolve_provider(&self) -> Option<(LLMProvider, String, String)> {
        let candidates: &[LLMProvider] = match self.preferred_provider {
            ProviderPreference::Auto => &LLMProvider::AUTO_ORDER,
            ProviderPreference::OpenAI => &[LLMProvider::OpenAI],
            ProviderPreference::Anthropic => &[LLMProvider::Anthropic],
            ProviderPreference::Groq => &[LLMProvider::Groq],
        };

        candidates.iter().find_map(|&provider| {
            let settings = self.settings(provider);
            let key = settings.api_key.as_ref().filter(|k| !k.trim().is_empty())?;
            let model = settings
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string());
            Some((provider, model, key.clone()))
        })
    }
}

//! External LLM provider implementations.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API with a separate system field.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::backend::CompletionBackend;
use crate::config::LLMConfig;
use crate::error::{LlmError, Result};
use crate::types::{CompletionRequest, LLMProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Completion backend talking to a hosted provider over HTTP.
pub struct HttpBackend {
    client: Client,
    provider: LLMProvider,
    model: String,
    api_key: String,
}

impl HttpBackend {
    pub fn new(provider: LLMProvider, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            provider,
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a backend for the configured provider, if any key is set.
    pub fn from_config(config: &LLMConfig) -> Option<Self> {
        config
            .resolve_provider()
            .map(|(provider, model, key)| Self::new(provider, model, key))
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }

    async fn complete_openai_compat(&self, url: &str, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        debug!("Completing via {} with model {}", url, self.model);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let parsed = read_json(response).await?;
        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::MalformedResponse("missing choices[0].message.content".into()))
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "model": self.model,
            "system": request.system,
            "messages": [{"role": "user", "content": request.prompt}],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        debug!("Completing via Anthropic with model {}", self.model);

        let response = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let parsed = read_json(response).await?;
        parsed["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| LlmError::MalformedResponse("missing content[0].text".into()))
    }
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::Api { status, body });
    }
    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| LlmError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    fn name(&self) -> &str {
        match self.provider {
            LLMProvider::OpenAI => "openai",
            LLMProvider::Anthropic => "anthropic",
            LLMProvider::Groq => "groq",
        }
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        match self.provider {
            LLMProvider::OpenAI => self.complete_openai_compat(OPENAI_URL, &request).await,
            LLMProvider::Groq => self.complete_openai_compat(GROQ_URL, &request).await,
            LLMProvider::Anthropic => self.complete_anthropic(&request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_without_keys() {
        assert!(HttpBackend::from_config(&LLMConfig::default()).is_none());
    }

    #[test]
    fn test_from_config_picks_provider() {
        let config = LLMConfig {
            groq: crate::config::ProviderSettings {
                api_key: Some("gsk".into()),
                model: None,
            },
            ..Default::default()
        };
        let backend = HttpBackend::from_config(&config).unwrap();
        assert_eq!(backend.provider(), LLMProvider::Groq);
        assert_eq!(backend.name(), "groq");
    }
}

//! LLM and embedding provider abstractions
//!
//! Two seams: [`LlmProvider`] for chat generation (blocking and streaming)
//! and [`EmbeddingProvider`] for query/document vectors. Concrete backends
//! are Ollama (local) and OpenRouter (hosted, OpenAI-compatible); factories
//! pick one from config and fail fast on anything unknown.

mod ollama;
mod openrouter;

pub use ollama::{OllamaEmbeddingProvider, OllamaProvider};
pub use openrouter::OpenRouterProvider;

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One turn in a chat exchange, as sent to the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A complete (non-streamed) generation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub provider: String,
    pub tokens_used: Option<u64>,
    pub finish_reason: Option<String>,
}

/// Chat generation backend
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// Run a full chat completion
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<LlmResponse>;

    /// Stream a chat completion as text deltas
    ///
    /// The returned channel yields content chunks in order; an Err item is
    /// terminal. Dropping the receiver cancels the underlying request.
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<mpsc::Receiver<Result<String>>>;

    /// Whether the backend is reachable and serving the configured model
    async fn health_check(&self) -> bool;
}

/// Text embedding backend
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Expected output dimensionality
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn health_check(&self) -> bool;
}

/// Build the configured LLM provider
pub fn create_llm_provider(config: &Config) -> Result<Arc<dyn LlmProvider>> {
    match config.llm.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(
            &config.llm.ollama_host,
            &config.llm.model,
        )?)),
        "openrouter" => {
            let api_key = std::env::var(&config.llm.openrouter_api_key_env).map_err(|_| {
                Error::Config(format!(
                    "OpenRouter API key not set: export {}",
                    config.llm.openrouter_api_key_env
                ))
            })?;
            Ok(Arc::new(OpenRouterProvider::new(
                &config.llm.openrouter_base_url,
                &config.llm.openrouter_model,
                &api_key,
            )?))
        }
        other => Err(Error::Config(format!(
            "Unknown LLM provider '{}'; expected 'ollama' or 'openrouter'",
            other
        ))),
    }
}

/// Build the configured embedding provider
pub fn create_embedding_provider(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.embedding.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaEmbeddingProvider::new(
            &config.llm.ollama_host,
            &config.embedding.model,
            config.embedding.dimension,
        )?)),
        other => Err(Error::Config(format!(
            "Unknown embedding provider '{}'; expected 'ollama'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_unknown_providers_rejected_at_construction() {
        let mut config = Config::default();
        config.llm.provider = "gpt-in-a-box".to_string();
        let err = create_llm_provider(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let mut config = Config::default();
        config.embedding.provider = "word2vec".to_string();
        let err = create_embedding_provider(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_config_builds_ollama_providers() {
        let config = Config::default();
        let llm = create_llm_provider(&config).unwrap();
        assert_eq!(llm.name(), "ollama");
        let embedder = create_embedding_provider(&config).unwrap();
        assert_eq!(embedder.name(), "ollama");
        assert_eq!(embedder.dimensions(), 768);
    }

    #[test]
    fn test_chat_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").role, "assistant");
    }
}

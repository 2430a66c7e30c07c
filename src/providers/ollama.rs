//! Ollama provider (local inference)
//!
//! Chat goes through `/api/chat` (NDJSON when streaming), embeddings
//! through `/api/embeddings`, and health through `/api/tags`.

use crate::error::{Error, Result};
use crate::providers::{ChatMessage, EmbeddingProvider, LlmProvider, LlmResponse};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

/// Generation can be slow on local hardware
const CHAT_TIMEOUT: Duration = Duration::from_secs(300);
const EMBED_TIMEOUT: Duration = Duration::from_secs(60);
const STREAM_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatChunk {
    #[serde(default)]
    message: Option<OllamaChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    eval_count: Option<u64>,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaChunkMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}

/// Chat generation via a local Ollama server
#[derive(Debug)]
pub struct OllamaProvider {
    client: Client,
    base_url: Url,
    model: String,
}

impl OllamaProvider {
    pub fn new(host: &str, model: &str) -> Result<Self> {
        let base_url = Url::parse(host)?;
        let client = Client::builder().timeout(CHAT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid Ollama URL: {}", e)))
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<LlmResponse> {
        let url = self.endpoint("/api/chat")?;
        let request = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: OllamaOptions {
                temperature,
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Ollama request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Provider(format!("Ollama returned an error: {}", e)))?;

        let chunk: OllamaChatChunk = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Invalid Ollama response: {}", e)))?;

        let content = chunk
            .message
            .map(|m| m.content)
            .ok_or_else(|| Error::Provider("Ollama response had no message".to_string()))?;

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            provider: "ollama".to_string(),
            tokens_used: chunk.eval_count,
            finish_reason: chunk.done_reason,
        })
    }

    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<mpsc::Receiver<Result<String>>> {
        let url = self.endpoint("/api/chat")?;
        let request = OllamaChatRequest {
            model: &self.model,
            messages,
            stream: true,
            options: OllamaOptions {
                temperature,
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Ollama request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Provider(format!("Ollama returned an error: {}", e)))?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            'outer: while let Some(item) = stream.next().await {
                let bytes = match item {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(Error::Provider(format!("Ollama stream failed: {}", e))))
                            .await;
                        return;
                    }
                };
                buffer.extend_from_slice(&bytes);

                // NDJSON: one chunk per line
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match parse_ndjson_line(&line) {
                        Ok(None) => {}
                        Ok(Some(chunk)) => {
                            if let Some(message) = chunk.message {
                                if !message.content.is_empty()
                                    && tx.send(Ok(message.content)).await.is_err()
                                {
                                    // Receiver dropped: stop reading
                                    break 'outer;
                                }
                            }
                            if chunk.done {
                                break 'outer;
                            }
                        }
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            return;
                        }
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn health_check(&self) -> bool {
        model_available(&self.client, &self.base_url, &self.model).await
    }
}

/// Text embeddings via a local Ollama server
#[derive(Debug)]
pub struct OllamaEmbeddingProvider {
    client: Client,
    base_url: Url,
    model: String,
    dimension: usize,
}

impl OllamaEmbeddingProvider {
    pub fn new(host: &str, model: &str, dimension: usize) -> Result<Self> {
        let base_url = Url::parse(host)?;
        let client = Client::builder().timeout(EMBED_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn dimensions(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self
            .base_url
            .join("/api/embeddings")
            .map_err(|e| Error::Config(format!("Invalid Ollama URL: {}", e)))?;
        let request = OllamaEmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Ollama embedding request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Embedding(format!("Ollama embedding error: {}", e)))?;

        let parsed: OllamaEmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Invalid embedding response: {}", e)))?;

        if parsed.embedding.len() != self.dimension {
            return Err(Error::Embedding(format!(
                "Model '{}' returned {} dimensions, expected {}",
                self.model,
                parsed.embedding.len(),
                self.dimension
            )));
        }

        Ok(parsed.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // The embeddings endpoint is single-prompt; batch sequentially
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    async fn health_check(&self) -> bool {
        model_available(&self.client, &self.base_url, &self.model).await
    }
}

fn parse_ndjson_line(line: &[u8]) -> Result<Option<OllamaChatChunk>> {
    let trimmed = std::str::from_utf8(line)
        .map_err(|e| Error::Provider(format!("Invalid UTF-8 in Ollama stream: {}", e)))?
        .trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let chunk: OllamaChatChunk = serde_json::from_str(trimmed)
        .map_err(|e| Error::Provider(format!("Invalid Ollama stream chunk: {}", e)))?;
    Ok(Some(chunk))
}

/// Check `/api/tags` for the model, ignoring the tag suffix
/// ("llama3.2:latest" serves requests for "llama3.2")
async fn model_available(client: &Client, base_url: &Url, model: &str) -> bool {
    let Ok(url) = base_url.join("/api/tags") else {
        return false;
    };
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("Ollama health check failed: {}", e);
            return false;
        }
    };
    if !response.status().is_success() {
        return false;
    }
    let tags: OllamaTagsResponse = match response.json().await {
        Ok(t) => t,
        Err(_) => return false,
    };

    let wanted = model.split(':').next().unwrap_or(model);
    let found = tags
        .models
        .iter()
        .any(|m| m.name.split(':').next().unwrap_or(&m.name) == wanted);
    if !found {
        debug!(model, "Model not present in Ollama tags");
    }
    found
}

//! OpenRouter provider (hosted, OpenAI-compatible API)

use crate::error::{Error, Result};
use crate::providers::{ChatMessage, LlmProvider, LlmResponse};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

const CHAT_TIMEOUT: Duration = Duration::from_secs(300);
const STREAM_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<MessageBody>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Chat generation via the OpenRouter API
#[derive(Debug)]
pub struct OpenRouterProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenRouterProvider {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("OpenRouter API key is empty".to_string()));
        }
        let client = Client::builder().timeout(CHAT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn completions_request(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
        stream: bool,
    ) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
                temperature,
                max_tokens,
                stream,
            })
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
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
        let response = self
            .completions_request(messages, temperature, max_tokens, false)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("OpenRouter request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Provider(format!("OpenRouter returned an error: {}", e)))?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Provider(format!("Invalid OpenRouter response: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider("OpenRouter response had no choices".to_string()))?;
        let content = choice
            .message
            .map(|m| m.content)
            .ok_or_else(|| Error::Provider("OpenRouter choice had no message".to_string()))?;

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            provider: "openrouter".to_string(),
            tokens_used: parsed.usage.and_then(|u| u.total_tokens),
            finish_reason: choice.finish_reason,
        })
    }

    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<mpsc::Receiver<Result<String>>> {
        let response = self
            .completions_request(messages, temperature, max_tokens, true)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("OpenRouter request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Provider(format!("OpenRouter returned an error: {}", e)))?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            'outer: while let Some(item) = stream.next().await {
                let bytes = match item {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(Error::Provider(format!(
                                "OpenRouter stream failed: {}",
                                e
                            ))))
                            .await;
                        return;
                    }
                };
                buffer.extend_from_slice(&bytes);

                // Server-sent events: "data: {json}" lines, "[DONE]" terminal
                while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match parse_sse_line(&line) {
                        Ok(SseEvent::Skip) => {}
                        Ok(SseEvent::Done) => break 'outer,
                        Ok(SseEvent::Content(text)) => {
                            if !text.is_empty() && tx.send(Ok(text)).await.is_err() {
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
        let request = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key);
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("OpenRouter health check failed: {}", e);
                false
            }
        }
    }
}

enum SseEvent {
    Content(String),
    Done,
    Skip,
}

fn parse_sse_line(line: &[u8]) -> Result<SseEvent> {
    let trimmed = std::str::from_utf8(line)
        .map_err(|e| Error::Provider(format!("Invalid UTF-8 in OpenRouter stream: {}", e)))?
        .trim();

    let Some(payload) = trimmed.strip_prefix("data:") else {
        // Blank keep-alives and comment lines
        return Ok(SseEvent::Skip);
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| Error::Provider(format!("Invalid OpenRouter stream chunk: {}", e)))?;
    let content = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta)
        .and_then(|d| d.content)
        .unwrap_or_default();
    Ok(SseEvent::Content(content))
}

//! Conversation orchestration
//!
//! Ties the pipeline together: detect the language, resolve a translation,
//! retrieve scripture, build the grounded system prompt, and generate.
//! Retrieval failures degrade to a no-citation answer; generation failures
//! are fatal and surface to the caller.

mod prompts;

pub use prompts::{system_prompt, SYSTEM_PROMPT};

use crate::config::Config;
use crate::context::build_scripture_context;
use crate::error::Result;
use crate::language::{detect_language, resolve_translation};
use crate::providers::{ChatMessage, LlmProvider};
use crate::search::{SearchResults, SearchService, VerseResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const STREAM_CHANNEL_CAPACITY: usize = 32;

/// A chat turn from the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    /// Whether to retrieve scripture context for this turn
    #[serde(default = "default_true")]
    pub include_search: bool,
    /// Explicit translation choice; overrides language detection
    #[serde(default)]
    pub preferred_translation: Option<String>,
}

fn default_true() -> bool {
    true
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_history: Vec::new(),
            include_search: true,
            preferred_translation: None,
        }
    }
}

/// A complete chat answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message_id: Uuid,
    pub message: String,
    /// What retrieval found; None when retrieval was skipped or failed
    pub scripture_context: Option<SearchResults>,
    pub provider: String,
    pub model: String,
    /// Translation the verses were drawn from
    pub detected_translation: String,
}

/// One event in a streamed chat answer
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Content(String),
    Done,
    Error(String),
}

/// A streaming chat answer: retrieval metadata up front, content as it
/// arrives
pub struct ChatStream {
    pub message_id: Uuid,
    pub scripture_context: Option<SearchResults>,
    pub detected_translation: String,
    pub events: mpsc::Receiver<StreamEvent>,
}

struct PreparedTurn {
    messages: Vec<ChatMessage>,
    scripture_context: Option<SearchResults>,
    translation: String,
}

/// Chat pipeline: search service + generation backend
pub struct ChatService {
    search: SearchService,
    llm: Arc<dyn LlmProvider>,
    config: Config,
}

impl ChatService {
    pub fn new(search: SearchService, llm: Arc<dyn LlmProvider>, config: Config) -> Self {
        Self {
            search,
            llm,
            config,
        }
    }

    /// Answer a chat turn in full
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let prepared = self.prepare(request).await?;

        let response = self
            .llm
            .chat(
                &prepared.messages,
                self.config.llm.temperature,
                self.config.llm.max_tokens,
            )
            .await?;

        info!(
            provider = response.provider,
            model = response.model,
            translation = prepared.translation,
            "Chat turn complete"
        );

        Ok(ChatResponse {
            message_id: Uuid::new_v4(),
            message: response.content,
            scripture_context: prepared.scripture_context,
            provider: response.provider,
            model: response.model,
            detected_translation: prepared.translation,
        })
    }

    /// Answer a chat turn as a stream of events
    ///
    /// Retrieval runs up front so the scripture context is available
    /// before the first content chunk. The event stream always ends with
    /// exactly one `Done` or `Error`.
    pub async fn chat_stream(&self, request: &ChatRequest) -> Result<ChatStream> {
        let prepared = self.prepare(request).await?;

        let mut provider_rx = self
            .llm
            .chat_stream(
                &prepared.messages,
                self.config.llm.temperature,
                self.config.llm.max_tokens,
            )
            .await?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            while let Some(item) = provider_rx.recv().await {
                let event = match item {
                    Ok(chunk) => StreamEvent::Content(chunk),
                    Err(e) => {
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(StreamEvent::Done).await;
        });

        Ok(ChatStream {
            message_id: Uuid::new_v4(),
            scripture_context: prepared.scripture_context,
            detected_translation: prepared.translation,
            events: rx,
        })
    }

    /// A verse with surrounding verses, for "show me the context" asks
    pub async fn get_verse_context(
        &self,
        book: &str,
        chapter: i64,
        verse: i64,
        context_size: i64,
    ) -> Result<Vec<VerseResult>> {
        self.search.get_context(book, chapter, verse, context_size).await
    }

    /// Steps shared by blocking and streaming chat: translation
    /// resolution, retrieval, and prompt assembly
    async fn prepare(&self, request: &ChatRequest) -> Result<PreparedTurn> {
        let language = detect_language(&request.message, &self.config.base_language);
        let translation =
            resolve_translation(request.preferred_translation.as_deref(), &language);
        debug!(language, translation, "Resolved translation");

        let scripture_context = if request.include_search {
            self.retrieve(&request.message, &translation).await
        } else {
            None
        };

        let mut system = String::new();
        if request.include_search {
            let block = match &scripture_context {
                Some(results) => build_scripture_context(&results.verses, &results.passages),
                // Retrieval failed: forbid citation rather than letting
                // the model improvise
                None => build_scripture_context(&[], &[]),
            };
            system.push_str(&block);
            system.push('\n');
        }
        system.push_str(&system_prompt(&language));

        let mut messages = Vec::with_capacity(request.conversation_history.len() + 2);
        messages.push(ChatMessage::system(system));

        let history = &request.conversation_history;
        let window_start = history.len().saturating_sub(self.config.chat.max_history);
        messages.extend(history[window_start..].iter().cloned());
        messages.push(ChatMessage::user(&request.message));

        Ok(PreparedTurn {
            messages,
            scripture_context,
            translation,
        })
    }

    /// Retrieval with a deadline; any failure degrades to None
    async fn retrieve(&self, message: &str, translation: &str) -> Option<SearchResults> {
        let deadline = Duration::from_secs(self.config.chat.retrieval_timeout_secs);
        let search = self.search.search(
            message,
            self.config.chat.max_context_verses,
            self.config.chat.max_context_passages,
            self.config.chat.similarity_threshold,
            Some(translation),
        );

        match tokio::time::timeout(deadline, search).await {
            Ok(Ok(results)) => Some(results),
            Ok(Err(e)) => {
                warn!("Scripture search failed, continuing without context: {}", e);
                None
            }
            Err(_) => {
                warn!("Scripture search timed out after {:?}", deadline);
                None
            }
        }
    }
}

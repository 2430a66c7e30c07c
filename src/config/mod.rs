//! Configuration management
//!
//! Config lives in a TOML file under the base directory (default
//! `~/.bible-chat/config.toml`, overridable with `BIBLE_CHAT_HOME` or
//! `--config`). Every field has a sensible default so `init` produces a
//! working local setup out of the box.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "scripture.db";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chat: ChatConfig,
    /// Language assumed when detection is inconclusive
    pub base_language: String,
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Generation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "ollama" or "openrouter"
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub ollama_host: String,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    /// Env var holding the API key; never stored in the file itself
    pub openrouter_api_key_env: String,
}

/// Embedding backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
}

/// Retrieval and conversation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub max_context_verses: usize,
    pub max_context_passages: usize,
    pub similarity_threshold: f32,
    /// How many history messages are replayed to the model
    pub max_history: usize,
    pub retrieval_timeout_secs: u64,
    /// Collapse cross-translation duplicates in unfiltered search
    pub dedupe_translations: bool,
}

/// Resolved filesystem locations, never serialized
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub base_dir: PathBuf,
    pub db_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            chat: ChatConfig::default(),
            base_language: "en".to_string(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            ollama_host: "http://localhost:11434".to_string(),
            openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
            openrouter_model: "meta-llama/llama-3.3-70b-instruct".to_string(),
            openrouter_api_key_env: "OPENROUTER_API_KEY".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimension: 768,
            batch_size: 32,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_context_verses: 10,
            max_context_passages: 2,
            similarity_threshold: 0.35,
            max_history: 10,
            retrieval_timeout_secs: 10,
            dedupe_translations: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let base_dir = default_base_dir();
        let db_file = base_dir.join(DB_FILE_NAME);
        Self { base_dir, db_file }
    }
}

impl Config {
    /// Load config from a specific file, or the default location
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let (path, base_dir) = match config_path {
            Some(p) => {
                let base = p
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(default_base_dir);
                (p.to_path_buf(), base)
            }
            None => {
                let base = default_base_dir();
                (base.join(CONFIG_FILE_NAME), base)
            }
        };

        let mut config = if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Config::default()
        };

        config.paths = PathsConfig {
            db_file: base_dir.join(DB_FILE_NAME),
            base_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Write config to its base directory, creating it if needed
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.paths.base_dir)?;
        let path = self.paths.base_dir.join(CONFIG_FILE_NAME);
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        debug!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.chat.similarity_threshold) {
            return Err(Error::Config(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.chat.similarity_threshold
            )));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::Config("embedding dimension must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Base directory: `$BIBLE_CHAT_HOME`, else `~/.bible-chat`
pub fn default_base_dir() -> PathBuf {
    if let Ok(home) = std::env::var("BIBLE_CHAT_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bible-chat")
}

//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::store::{ScriptureStore, StoreStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub base_dir: String,
    pub db_path: String,
    pub llm_provider: String,
    pub llm_model: String,
    pub llm_available: bool,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub embedding_available: bool,
    pub store: StoreStats,
}

/// Get system status
pub async fn cmd_status(
    config: &Config,
    store: &ScriptureStore,
    llm: Arc<dyn LlmProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<StatusInfo> {
    info!("Getting status");

    let store_stats = store.stats().await?;
    let llm_available = llm.health_check().await;
    let embedding_available = embedder.health_check().await;

    Ok(StatusInfo {
        base_dir: config.paths.base_dir.display().to_string(),
        db_path: config.paths.db_file.display().to_string(),
        llm_provider: config.llm.provider.clone(),
        llm_model: llm.model().to_string(),
        llm_available,
        embedding_model: config.embedding.model.clone(),
        embedding_dimension: embedder.dimensions(),
        embedding_available,
        store: store_stats,
    })
}

pub fn print_status(status: &StatusInfo) {
    println!("bible-chat status");
    println!("  base dir:   {}", status.base_dir);
    println!("  database:   {}", status.db_path);
    println!(
        "  llm:        {} ({}) - {}",
        status.llm_provider,
        status.llm_model,
        availability(status.llm_available)
    );
    println!(
        "  embeddings: {} ({} dims) - {}",
        status.embedding_model,
        status.embedding_dimension,
        availability(status.embedding_available)
    );
    println!("  books:      {}", status.store.books);
    println!(
        "  verses:     {} ({} embedded)",
        status.store.verses, status.store.verses_with_embeddings
    );
    println!(
        "  passages:   {} ({} embedded)",
        status.store.passages, status.store.passages_with_embeddings
    );
}

fn availability(ok: bool) -> &'static str {
    if ok {
        "available"
    } else {
        "unavailable"
    }
}

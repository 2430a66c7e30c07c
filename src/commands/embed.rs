//! Embed command implementation
//!
//! Walks verses and passages that have no embedding yet and fills them in
//! batch by batch. Safe to interrupt and re-run; already-embedded rows
//! are never touched.

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::store::ScriptureStore;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tracing::info;

/// What an embed run did
#[derive(Debug, Clone, Default)]
pub struct EmbedStats {
    pub verses_embedded: usize,
    pub passages_embedded: usize,
}

/// Embed all verses and passages that are missing embeddings
pub async fn cmd_embed(
    store: &ScriptureStore,
    embedder: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    show_progress: bool,
) -> Result<EmbedStats> {
    let db_stats = store.stats().await?;
    let remaining_verses = (db_stats.verses - db_stats.verses_with_embeddings).max(0) as u64;
    let remaining_passages =
        (db_stats.passages - db_stats.passages_with_embeddings).max(0) as u64;

    info!(
        verses = remaining_verses,
        passages = remaining_passages,
        model = embedder.name(),
        dimension = embedder.dimensions(),
        "Starting embed pass"
    );

    let progress = make_progress(show_progress, remaining_verses + remaining_passages);
    let mut stats = EmbedStats::default();

    loop {
        let batch = store.verses_missing_embeddings(batch_size).await?;
        if batch.is_empty() {
            break;
        }
        let texts: Vec<String> = batch.iter().map(|v| v.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        for (verse, embedding) in batch.iter().zip(embeddings.iter()) {
            store.set_verse_embedding(verse.id, embedding).await?;
            stats.verses_embedded += 1;
            progress.inc(1);
        }
    }

    loop {
        let batch = store.passages_missing_embeddings(batch_size).await?;
        if batch.is_empty() {
            break;
        }
        let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        for (passage, embedding) in batch.iter().zip(embeddings.iter()) {
            store.set_passage_embedding(passage.id, embedding).await?;
            stats.passages_embedded += 1;
            progress.inc(1);
        }
    }

    progress.finish_and_clear();
    info!(
        verses = stats.verses_embedded,
        passages = stats.passages_embedded,
        "Embed pass complete"
    );
    Ok(stats)
}

fn make_progress(show: bool, total: u64) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    bar
}

pub fn print_embed_stats(stats: &EmbedStats) {
    println!(
        "Embedded {} verses and {} passages",
        stats.verses_embedded, stats.passages_embedded
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct CountingEmbedder {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        fn name(&self) -> &str {
            "counting"
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            if self.fail {
                return Err(Error::Embedding("offline".to_string()));
            }
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut out = Vec::new();
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        async fn health_check(&self) -> bool {
            !self.fail
        }
    }

    async fn store_with_verses(n: i64) -> ScriptureStore {
        let store = ScriptureStore::open_in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        for v in 1..=n {
            store
                .upsert_verse(43, 1, v, "web", &format!("verse {v}"))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_embed_fills_missing_only() {
        let store = store_with_verses(5).await;
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            fail: false,
        });

        let stats = cmd_embed(&store, embedder.clone(), 2, false).await.unwrap();
        assert_eq!(stats.verses_embedded, 5);
        assert_eq!(store.stats().await.unwrap().verses_with_embeddings, 5);

        // Second run has nothing to do
        let stats = cmd_embed(&store, embedder, 2, false).await.unwrap();
        assert_eq!(stats.verses_embedded, 0);
    }

    #[tokio::test]
    async fn test_embed_batches_by_size() {
        let store = store_with_verses(5).await;
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            fail: false,
        });

        cmd_embed(&store, embedder.clone(), 2, false).await.unwrap();
        // 5 verses at batch size 2: three batches
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_embed_failure_propagates() {
        let store = store_with_verses(1).await;
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            fail: true,
        });

        let err = cmd_embed(&store, embedder, 2, false).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }
}

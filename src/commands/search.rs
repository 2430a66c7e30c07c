//! Search command implementation

use crate::error::Result;
use crate::search::{SearchResults, SearchService, VerseResult};
use tracing::info;

/// Options for the search command
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_verses: usize,
    pub max_passages: usize,
    pub threshold: f32,
    pub translation: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_verses: 10,
            max_passages: 2,
            threshold: 0.4,
            translation: None,
        }
    }
}

/// Semantic search over the scripture store
pub async fn cmd_search(
    search: &SearchService,
    query: &str,
    options: &SearchOptions,
) -> Result<SearchResults> {
    info!(query, threshold = options.threshold, "Searching");
    search
        .search(
            query,
            options.max_verses,
            options.max_passages,
            options.threshold,
            options.translation.as_deref(),
        )
        .await
}

/// Plain text search, for when no embedding backend is available
pub async fn cmd_text_search(
    search: &SearchService,
    query: &str,
    limit: usize,
) -> Result<Vec<VerseResult>> {
    info!(query, "Text search");
    search.text_search(query, limit).await
}

pub fn print_search_results(results: &SearchResults) {
    if results.is_empty() {
        println!("No results above the similarity threshold.");
        return;
    }

    if !results.verses.is_empty() {
        println!("Verses:");
        for v in &results.verses {
            match v.similarity {
                Some(score) => println!("  [{:.3}] {} - {}", score, v.reference, v.text),
                None => println!("  {} - {}", v.reference, v.text),
            }
        }
    }

    if !results.passages.is_empty() {
        println!("Passages:");
        for p in &results.passages {
            let score = p
                .similarity
                .map(|s| format!("[{:.3}] ", s))
                .unwrap_or_default();
            println!("  {}{} ({})", score, p.title, p.reference);
        }
    }
}

pub fn print_verses(verses: &[VerseResult]) {
    if verses.is_empty() {
        println!("No matching verses.");
        return;
    }
    for v in verses {
        println!("  {} - {}", v.reference, v.text);
    }
}

//! Semantic scripture search
//!
//! Embeds the query, runs similarity search over verses and passages, and
//! shapes the hits into presentation-ready results with localized
//! references and rounded scores.

use crate::error::Result;
use crate::locale::localize_book_name;
use crate::models::{Passage, Verse};
use crate::providers::EmbeddingProvider;
use crate::store::ScriptureStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A verse hit, ready for display or prompt building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseResult {
    /// Localized reference (e.g., "Giovanni 3:16" for ita1927)
    pub reference: String,
    pub text: String,
    /// Canonical English book name
    pub book: String,
    pub chapter: i64,
    pub verse: i64,
    pub translation: Option<String>,
    /// Similarity score rounded to 3 decimals; None for direct lookups
    pub similarity: Option<f32>,
}

/// A passage hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageResult {
    pub title: String,
    pub reference: String,
    pub text: String,
    pub topics: Option<Vec<String>>,
    pub similarity: Option<f32>,
}

/// Combined verse and passage results for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub verses: Vec<VerseResult>,
    pub passages: Vec<PassageResult>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty() && self.passages.is_empty()
    }
}

/// Search service: embedding provider + scripture store
#[derive(Clone)]
pub struct SearchService {
    store: ScriptureStore,
    embedder: Arc<dyn EmbeddingProvider>,
    dedupe_translations: bool,
}

impl SearchService {
    pub fn new(
        store: ScriptureStore,
        embedder: Arc<dyn EmbeddingProvider>,
        dedupe_translations: bool,
    ) -> Self {
        Self {
            store,
            embedder,
            dedupe_translations,
        }
    }

    /// Semantic search over verses and passages
    ///
    /// Verses honor the translation filter; passages are curated once and
    /// searched across the board.
    pub async fn search(
        &self,
        query: &str,
        max_verses: usize,
        max_passages: usize,
        threshold: f32,
        translation: Option<&str>,
    ) -> Result<SearchResults> {
        let query_embedding = self.embedder.embed(query).await?;

        let verse_hits = self
            .store
            .search_verses(
                &query_embedding,
                max_verses,
                threshold,
                translation,
                self.dedupe_translations,
            )
            .await?;
        let passage_hits = self
            .store
            .search_passages(&query_embedding, max_passages, threshold)
            .await?;

        debug!(
            verses = verse_hits.len(),
            passages = passage_hits.len(),
            "Search complete"
        );

        Ok(SearchResults {
            query: query.to_string(),
            verses: verse_hits
                .into_iter()
                .map(|(v, score)| verse_result(v, Some(score)))
                .collect(),
            passages: passage_hits
                .into_iter()
                .map(|(p, score)| passage_result(p, Some(score)))
                .collect(),
        })
    }

    /// Look up a single verse by reference
    pub async fn get_verse(
        &self,
        book: &str,
        chapter: i64,
        verse: i64,
        translation: Option<&str>,
    ) -> Result<Option<VerseResult>> {
        let found = self.store.get_verse(book, chapter, verse, translation).await?;
        Ok(found.map(|v| verse_result(v, None)))
    }

    /// Look up a verse range (e.g., John 3:16-21)
    pub async fn get_verse_range(
        &self,
        book: &str,
        chapter: i64,
        start_verse: i64,
        end_verse: i64,
    ) -> Result<Vec<VerseResult>> {
        let verses = self
            .store
            .get_verse_range(book, chapter, start_verse, end_verse)
            .await?;
        Ok(verses.into_iter().map(|v| verse_result(v, None)).collect())
    }

    /// A verse with surrounding context from the same chapter
    ///
    /// The window starts at most `context_size` verses before the target,
    /// clamped at verse 1, and runs `context_size` past it.
    pub async fn get_context(
        &self,
        book: &str,
        chapter: i64,
        verse: i64,
        context_size: i64,
    ) -> Result<Vec<VerseResult>> {
        let start = (verse - context_size).max(1);
        let end = verse + context_size;
        self.get_verse_range(book, chapter, start, end).await
    }

    /// Plain substring search, for when no embedding provider is reachable
    pub async fn text_search(&self, query: &str, limit: usize) -> Result<Vec<VerseResult>> {
        let verses = self.store.text_search(query, limit).await?;
        Ok(verses.into_iter().map(|v| verse_result(v, None)).collect())
    }
}

fn verse_result(v: Verse, similarity: Option<f32>) -> VerseResult {
    let localized = localize_book_name(&v.book_name, &v.translation);
    VerseResult {
        reference: format!("{} {}:{}", localized, v.chapter_number, v.verse_number),
        text: v.text,
        book: v.book_name,
        chapter: v.chapter_number,
        verse: v.verse_number,
        translation: Some(v.translation),
        similarity: similarity.map(round3),
    }
}

fn passage_result(p: Passage, similarity: Option<f32>) -> PassageResult {
    PassageResult {
        title: p.title.clone(),
        reference: p.reference(),
        text: p.text.clone(),
        topics: p.topic_list(),
        similarity: similarity.map(round3),
    }
}

/// Round a similarity score to 3 decimal places for display
fn round3(x: f32) -> f32 {
    (x * 1000.0).round() / 1000.0
}

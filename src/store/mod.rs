//! Scripture storage using SQLite
//!
//! This module owns all persisted scripture data:
//! - Books (canonical reference data, seeded at init)
//! - Verses (bulk-loaded per translation, embedded in a separate pass)
//! - Passages (hand-curated multi-verse spans)
//!
//! Vector similarity search runs in-process over embedding BLOBs, so the
//! whole search path works against a plain SQLite file.

mod schema;
mod vector;

pub use schema::*;
pub use vector::*;

use crate::config::Config;
use crate::error::Result;
use crate::language::DEFAULT_TRANSLATION;
use crate::models::{Book, Passage, Verse, BIBLE_BOOKS};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

const VERSE_SELECT: &str = r#"
    SELECT v.id, v.book_id, b.name AS book_name, v.chapter_number,
           v.verse_number, v.translation, v.text, v.embedding
    FROM verses v
    JOIN books b ON b.id = v.book_id
"#;

const PASSAGE_SELECT: &str = r#"
    SELECT p.id, p.title, p.start_book_id, b.name AS book_name,
           p.start_chapter, p.start_verse, p.end_chapter, p.end_verse,
           p.text, p.topics, p.embedding
    FROM passages p
    JOIN books b ON b.id = p.start_book_id
"#;

/// Database statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub books: i64,
    pub verses: i64,
    pub verses_with_embeddings: i64,
    pub passages: i64,
    pub passages_with_embeddings: i64,
}

/// Scripture database handle
#[derive(Clone)]
pub struct ScriptureStore {
    pool: SqlitePool,
}

impl ScriptureStore {
    /// Connect to the scripture database using config paths
    pub async fn connect(config: &Config) -> Result<Self> {
        Self::open(&config.paths.db_file).await
    }

    /// Open (or create) the database at the given path
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open an in-memory database (tests and ephemeral use)
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Initialize the schema and seed the canonical book table
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing scripture database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        self.seed_books().await?;
        Ok(())
    }

    /// Check if the database has been initialized
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM sqlite_master WHERE type='table' AND name='books'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(result.is_some())
    }

    /// Insert the 66 canonical books (idempotent)
    pub async fn seed_books(&self) -> Result<()> {
        for (name, abbreviation, testament, position) in BIBLE_BOOKS {
            sqlx::query(
                r#"
                INSERT INTO books (id, name, abbreviation, testament, position)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(name) DO NOTHING
                "#,
            )
            .bind(position)
            .bind(name)
            .bind(abbreviation)
            .bind(testament)
            .bind(position)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    // ===== Books =====

    /// Get all books in canonical order
    pub async fn get_all_books(&self) -> Result<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY position")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get a book by name (case-insensitive)
    pub async fn get_book_by_name(&self, name: &str) -> Result<Option<Book>> {
        let book =
            sqlx::query_as::<_, Book>("SELECT * FROM books WHERE lower(name) = lower(?)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(book)
    }

    // ===== Verses =====

    /// Get a specific verse by reference
    ///
    /// Book name match is case-insensitive. When no translation is given,
    /// the deployment default is preferred over any other loaded row.
    pub async fn get_verse(
        &self,
        book_name: &str,
        chapter: i64,
        verse: i64,
        translation: Option<&str>,
    ) -> Result<Option<Verse>> {
        let verse = match translation {
            Some(t) => {
                let sql = format!(
                    "{VERSE_SELECT} WHERE lower(b.name) = lower(?) AND v.chapter_number = ? \
                     AND v.verse_number = ? AND v.translation = ?"
                );
                sqlx::query_as::<_, Verse>(&sql)
                    .bind(book_name)
                    .bind(chapter)
                    .bind(verse)
                    .bind(t)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{VERSE_SELECT} WHERE lower(b.name) = lower(?) AND v.chapter_number = ? \
                     AND v.verse_number = ? \
                     ORDER BY (v.translation = ?) DESC, v.id LIMIT 1"
                );
                sqlx::query_as::<_, Verse>(&sql)
                    .bind(book_name)
                    .bind(chapter)
                    .bind(verse)
                    .bind(DEFAULT_TRANSLATION)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(verse)
    }

    /// Get all verses in a chapter, ordered by verse number
    pub async fn get_chapter_verses(
        &self,
        book_name: &str,
        chapter: i64,
        translation: Option<&str>,
    ) -> Result<Vec<Verse>> {
        let Some(t) = self
            .effective_translation(book_name, chapter, translation)
            .await?
        else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{VERSE_SELECT} WHERE lower(b.name) = lower(?) AND v.chapter_number = ? \
             AND v.translation = ? ORDER BY v.verse_number"
        );
        let verses = sqlx::query_as::<_, Verse>(&sql)
            .bind(book_name)
            .bind(chapter)
            .bind(t)
            .fetch_all(&self.pool)
            .await?;
        Ok(verses)
    }

    /// Get verses in a range (e.g., John 3:16-21), ordered by verse number
    pub async fn get_verse_range(
        &self,
        book_name: &str,
        chapter: i64,
        start_verse: i64,
        end_verse: i64,
    ) -> Result<Vec<Verse>> {
        let Some(t) = self
            .effective_translation(book_name, chapter, None)
            .await?
        else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{VERSE_SELECT} WHERE lower(b.name) = lower(?) AND v.chapter_number = ? \
             AND v.verse_number >= ? AND v.verse_number <= ? AND v.translation = ? \
             ORDER BY v.verse_number"
        );
        let verses = sqlx::query_as::<_, Verse>(&sql)
            .bind(book_name)
            .bind(chapter)
            .bind(start_verse)
            .bind(end_verse)
            .bind(t)
            .fetch_all(&self.pool)
            .await?;
        Ok(verses)
    }

    /// Case-insensitive substring search on verse text (fallback search mode)
    ///
    /// The query is treated as a literal: `%` and `_` match themselves,
    /// not as LIKE wildcards.
    pub async fn text_search(&self, query: &str, limit: usize) -> Result<Vec<Verse>> {
        let escaped = query
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let sql = format!("{VERSE_SELECT} WHERE v.text LIKE ? ESCAPE '\\' LIMIT ?");
        let verses = sqlx::query_as::<_, Verse>(&sql)
            .bind(format!("%{escaped}%"))
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(verses)
    }

    /// Resolve which translation a chapter read should use: the requested
    /// one, else the default if loaded, else whichever is loaded first.
    async fn effective_translation(
        &self,
        book_name: &str,
        chapter: i64,
        requested: Option<&str>,
    ) -> Result<Option<String>> {
        if let Some(t) = requested {
            return Ok(Some(t.to_string()));
        }

        let found: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT v.translation FROM verses v
            JOIN books b ON b.id = v.book_id
            WHERE lower(b.name) = lower(?) AND v.chapter_number = ?
            ORDER BY (v.translation = ?) DESC, v.id LIMIT 1
            "#,
        )
        .bind(book_name)
        .bind(chapter)
        .bind(DEFAULT_TRANSLATION)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.map(|(t,)| t))
    }

    // ===== Similarity search =====

    /// Semantic search over verse embeddings
    ///
    /// Similarity is `1 - cosine_distance`; only rows with a non-null
    /// embedding and similarity >= `threshold` are returned, best first,
    /// truncated to `limit`. Ties keep row order (stable sort). When
    /// `dedupe_translations` is set and no translation filter is given,
    /// only the best-scoring row per (book, chapter, verse) survives.
    pub async fn search_verses(
        &self,
        query_embedding: &[f32],
        limit: usize,
        threshold: f32,
        translation: Option<&str>,
        dedupe_translations: bool,
    ) -> Result<Vec<(Verse, f32)>> {
        let candidates = match translation {
            Some(t) => {
                let sql = format!(
                    "{VERSE_SELECT} WHERE v.embedding IS NOT NULL AND v.translation = ? \
                     ORDER BY v.id"
                );
                sqlx::query_as::<_, Verse>(&sql)
                    .bind(t)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql =
                    format!("{VERSE_SELECT} WHERE v.embedding IS NOT NULL ORDER BY v.id");
                sqlx::query_as::<_, Verse>(&sql).fetch_all(&self.pool).await?
            }
        };

        let mut scored = score_candidates(candidates, query_embedding, threshold, |v| {
            v.embedding.as_deref()
        });

        if dedupe_translations && translation.is_none() {
            let mut seen = std::collections::HashSet::new();
            scored.retain(|(v, _)| {
                seen.insert((v.book_id, v.chapter_number, v.verse_number))
            });
        }

        scored.truncate(limit);
        Ok(scored)
    }

    /// Semantic search over passage embeddings (no translation filter;
    /// passages are curated once, not per translation)
    pub async fn search_passages(
        &self,
        query_embedding: &[f32],
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<(Passage, f32)>> {
        let sql = format!("{PASSAGE_SELECT} WHERE p.embedding IS NOT NULL ORDER BY p.id");
        let candidates = sqlx::query_as::<_, Passage>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut scored = score_candidates(candidates, query_embedding, threshold, |p| {
            p.embedding.as_deref()
        });
        scored.truncate(limit);
        Ok(scored)
    }

    // ===== Write path (loader and embed pass) =====

    /// Insert a verse, or update its text if it already exists
    ///
    /// Re-loading a translation is idempotent: text is refreshed, existing
    /// embeddings are left in place for the embed pass to reconcile.
    pub async fn upsert_verse(
        &self,
        book_id: i64,
        chapter: i64,
        verse: i64,
        translation: &str,
        text: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO verses (book_id, chapter_number, verse_number, translation, text)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(book_id, chapter_number, verse_number, translation)
            DO UPDATE SET text = excluded.text
            "#,
        )
        .bind(book_id)
        .bind(chapter)
        .bind(verse)
        .bind(translation)
        .bind(text)
        .execute(&self.pool)
        .await?;
        // last_insert_rowid is only meaningful for fresh inserts
        Ok(result.rows_affected() > 0)
    }

    /// Insert a curated passage (idempotent on title + start reference)
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_passage(
        &self,
        title: &str,
        start_book_id: i64,
        start_chapter: i64,
        start_verse: i64,
        end_chapter: i64,
        end_verse: i64,
        text: &str,
        topics: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO passages
                (title, start_book_id, start_chapter, start_verse, end_chapter, end_verse, text, topics)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(title, start_book_id, start_chapter, start_verse)
            DO UPDATE SET end_chapter = excluded.end_chapter,
                          end_verse = excluded.end_verse,
                          text = excluded.text,
                          topics = excluded.topics
            "#,
        )
        .bind(title)
        .bind(start_book_id)
        .bind(start_chapter)
        .bind(start_verse)
        .bind(end_chapter)
        .bind(end_verse)
        .bind(text)
        .bind(topics)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Store a verse embedding
    pub async fn set_verse_embedding(&self, verse_id: i64, embedding: &[f32]) -> Result<()> {
        sqlx::query("UPDATE verses SET embedding = ? WHERE id = ?")
            .bind(vec_to_blob(embedding))
            .bind(verse_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store a passage embedding
    pub async fn set_passage_embedding(&self, passage_id: i64, embedding: &[f32]) -> Result<()> {
        sqlx::query("UPDATE passages SET embedding = ? WHERE id = ?")
            .bind(vec_to_blob(embedding))
            .bind(passage_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Verses that still need an embedding, oldest first
    pub async fn verses_missing_embeddings(&self, limit: usize) -> Result<Vec<Verse>> {
        let sql = format!("{VERSE_SELECT} WHERE v.embedding IS NULL ORDER BY v.id LIMIT ?");
        let verses = sqlx::query_as::<_, Verse>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(verses)
    }

    /// Passages that still need an embedding
    pub async fn passages_missing_embeddings(&self, limit: usize) -> Result<Vec<Passage>> {
        let sql = format!("{PASSAGE_SELECT} WHERE p.embedding IS NULL ORDER BY p.id LIMIT ?");
        let passages = sqlx::query_as::<_, Passage>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        Ok(passages)
    }

    /// Database statistics
    pub async fn stats(&self) -> Result<StoreStats> {
        let (books,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        let (verses,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM verses")
            .fetch_one(&self.pool)
            .await?;
        let (verses_with_embeddings,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM verses WHERE embedding IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        let (passages,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM passages")
            .fetch_one(&self.pool)
            .await?;
        let (passages_with_embeddings,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM passages WHERE embedding IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(StoreStats {
            books,
            verses,
            verses_with_embeddings,
            passages,
            passages_with_embeddings,
        })
    }
}

/// Score candidates against a query vector, keeping rows at or above the
/// threshold, best first. Rows whose stored embedding fails to decode to
/// the query's dimensionality are skipped, not errors.
fn score_candidates<T>(
    candidates: Vec<T>,
    query_embedding: &[f32],
    threshold: f32,
    embedding_of: impl Fn(&T) -> Option<&[u8]>,
) -> Vec<(T, f32)> {
    let mut scored: Vec<(T, f32)> = candidates
        .into_iter()
        .filter_map(|row| {
            let stored = blob_to_vec(embedding_of(&row)?);
            if stored.len() != query_embedding.len() {
                return None;
            }
            let similarity = cosine_similarity(query_embedding, &stored);
            (similarity >= threshold).then_some((row, similarity))
        })
        .collect();

    // Stable sort: ties keep underlying row order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> ScriptureStore {
        let store = ScriptureStore::open_in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        store
    }

    async fn insert_embedded_verse(
        store: &ScriptureStore,
        book_id: i64,
        chapter: i64,
        verse: i64,
        translation: &str,
        text: &str,
        embedding: &[f32],
    ) {
        store
            .upsert_verse(book_id, chapter, verse, translation, text)
            .await
            .unwrap();
        let stored = store
            .get_verse("John", chapter, verse, Some(translation))
            .await
            .unwrap();
        // Only fill in embeddings for verses in John, where tests need them
        if let Some(v) = stored {
            store.set_verse_embedding(v.id, embedding).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_init_seeds_66_books() {
        let store = test_store().await;
        let books = store.get_all_books().await.unwrap();
        assert_eq!(books.len(), 66);
        assert_eq!(books[0].name, "Genesis");
        assert_eq!(books[65].name, "Revelation");
        // Seeding is idempotent
        store.seed_books().await.unwrap();
        assert_eq!(store.get_all_books().await.unwrap().len(), 66);
    }

    #[tokio::test]
    async fn test_get_verse_case_insensitive() {
        let store = test_store().await;
        store
            .upsert_verse(43, 3, 16, "web", "For God so loved the world")
            .await
            .unwrap();

        let verse = store.get_verse("john", 3, 16, None).await.unwrap().unwrap();
        assert_eq!(verse.book_name, "John");
        assert_eq!(verse.reference(), "John 3:16");

        assert!(store.get_verse("John", 3, 99, None).await.unwrap().is_none());
        assert!(store.get_verse("Atlantis", 1, 1, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_verse_prefers_default_translation() {
        let store = test_store().await;
        store
            .upsert_verse(43, 3, 16, "kjv", "For God so loved the world (KJV)")
            .await
            .unwrap();
        store
            .upsert_verse(43, 3, 16, "web", "For God so loved the world (WEB)")
            .await
            .unwrap();

        let verse = store.get_verse("John", 3, 16, None).await.unwrap().unwrap();
        assert_eq!(verse.translation, "web");

        let kjv = store
            .get_verse("John", 3, 16, Some("kjv"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kjv.translation, "kjv");
    }

    #[tokio::test]
    async fn test_reload_updates_text_only() {
        let store = test_store().await;
        store.upsert_verse(43, 3, 16, "web", "old text").await.unwrap();
        let v = store.get_verse("John", 3, 16, None).await.unwrap().unwrap();
        store.set_verse_embedding(v.id, &[1.0, 0.0]).await.unwrap();

        store.upsert_verse(43, 3, 16, "web", "new text").await.unwrap();
        let v2 = store.get_verse("John", 3, 16, None).await.unwrap().unwrap();
        assert_eq!(v2.id, v.id);
        assert_eq!(v2.text, "new text");
        assert!(v2.embedding.is_some());
    }

    #[tokio::test]
    async fn test_chapter_and_range_reads_ordered() {
        let store = test_store().await;
        for n in [3i64, 1, 2] {
            store
                .upsert_verse(19, 23, n, "web", &format!("Psalm 23 verse {}", n))
                .await
                .unwrap();
        }

        let chapter = store.get_chapter_verses("Psalms", 23, None).await.unwrap();
        let numbers: Vec<i64> = chapter.iter().map(|v| v.verse_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        let range = store.get_verse_range("psalms", 23, 2, 3).await.unwrap();
        let numbers: Vec<i64> = range.iter().map(|v| v.verse_number).collect();
        assert_eq!(numbers, vec![2, 3]);

        assert!(store
            .get_chapter_verses("Psalms", 151, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_text_search_substring() {
        let store = test_store().await;
        store
            .upsert_verse(43, 14, 27, "web", "Peace I leave with you.")
            .await
            .unwrap();
        store
            .upsert_verse(43, 14, 28, "web", "You heard how I told you.")
            .await
            .unwrap();

        let hits = store.text_search("peace", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].verse_number, 27);

        assert!(store.text_search("zzzzz", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_text_search_treats_wildcards_as_literals() {
        let store = test_store().await;
        store
            .upsert_verse(43, 1, 1, "web", "he gave a 100% tithe")
            .await
            .unwrap();
        store
            .upsert_verse(43, 1, 2, "web", "a 100 fold harvest")
            .await
            .unwrap();

        // "%" must not act as a LIKE wildcard
        let hits = store.text_search("100%", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].verse_number, 1);

        // "_" must not match arbitrary single characters
        assert!(store.text_search("100_", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_verses_threshold_and_order() {
        let store = test_store().await;
        insert_embedded_verse(&store, 43, 1, 1, "web", "close match", &[1.0, 0.0, 0.0]).await;
        insert_embedded_verse(&store, 43, 1, 2, "web", "near match", &[0.8, 0.6, 0.0]).await;
        insert_embedded_verse(&store, 43, 1, 3, "web", "orthogonal", &[0.0, 1.0, 0.0]).await;
        // No embedding: never eligible
        store
            .upsert_verse(43, 1, 4, "web", "unembedded")
            .await
            .unwrap();

        let query = [1.0f32, 0.0, 0.0];
        let loose = store
            .search_verses(&query, 10, 0.1, Some("web"), false)
            .await
            .unwrap();
        assert_eq!(loose.len(), 2);
        assert!(loose[0].1 >= loose[1].1);
        assert_eq!(loose[0].0.verse_number, 1);

        // Stricter threshold returns a subset of the looser call
        let strict = store
            .search_verses(&query, 10, 0.9, Some("web"), false)
            .await
            .unwrap();
        assert!(strict.len() <= loose.len());
        for (v, _) in &strict {
            assert!(loose.iter().any(|(lv, _)| lv.id == v.id));
        }

        // Limit truncates
        let limited = store
            .search_verses(&query, 1, 0.1, Some("web"), false)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].0.verse_number, 1);
    }

    #[tokio::test]
    async fn test_search_verses_translation_filter_and_dedupe() {
        let store = test_store().await;
        insert_embedded_verse(&store, 43, 3, 16, "web", "web text", &[1.0, 0.0]).await;
        insert_embedded_verse(&store, 43, 3, 16, "kjv", "kjv text", &[0.9, 0.1]).await;

        let query = [1.0f32, 0.0];
        let filtered = store
            .search_verses(&query, 10, 0.0, Some("kjv"), false)
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].0.translation, "kjv");

        let all = store
            .search_verses(&query, 10, 0.0, None, false)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let deduped = store
            .search_verses(&query, 10, 0.0, None, true)
            .await
            .unwrap();
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].0.translation, "web");
    }

    #[tokio::test]
    async fn test_search_skips_mismatched_dimensions() {
        let store = test_store().await;
        insert_embedded_verse(&store, 43, 1, 1, "web", "three dims", &[1.0, 0.0, 0.0]).await;
        insert_embedded_verse(&store, 43, 1, 2, "web", "two dims", &[1.0, 0.0]).await;

        let results = store
            .search_verses(&[1.0f32, 0.0, 0.0], 10, 0.0, None, false)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.verse_number, 1);
    }

    #[tokio::test]
    async fn test_search_passages() {
        let store = test_store().await;
        store
            .insert_passage(
                "The Lord's Prayer",
                40,
                6,
                9,
                6,
                13,
                "Our Father in heaven...",
                Some("prayer"),
            )
            .await
            .unwrap();
        let pending = store.passages_missing_embeddings(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        store
            .set_passage_embedding(pending[0].id, &[1.0, 0.0])
            .await
            .unwrap();

        let results = store.search_passages(&[1.0f32, 0.0], 5, 0.5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.reference(), "Matthew 6:9-13");
        assert!(store.passages_missing_embeddings(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = test_store().await;
        store.upsert_verse(1, 1, 1, "web", "In the beginning").await.unwrap();
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.books, 66);
        assert_eq!(stats.verses, 1);
        assert_eq!(stats.verses_with_embeddings, 0);
    }
}

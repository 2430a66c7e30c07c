//! Load command implementation
//!
//! Reads scripture from JSON files into the store. The verse format is
//! the common one used by public-domain Bible dumps: an array of books,
//! each with a `chapters` array of verse-text arrays. Books are matched
//! by English name, then abbreviation, then position when the file
//! carries the full canon in order.

use crate::error::{Error, Result};
use crate::language::is_valid_translation;
use crate::models::BIBLE_BOOKS;
use crate::store::ScriptureStore;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// One book in a verse dump
#[derive(Debug, Deserialize)]
struct BookEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "abbr")]
    abbrev: Option<String>,
    /// chapters[c][v] is the text of chapter c+1, verse v+1
    chapters: Vec<Vec<String>>,
}

/// One curated passage in a passage file
#[derive(Debug, Deserialize)]
struct PassageEntry {
    title: String,
    book: String,
    start_chapter: i64,
    start_verse: i64,
    end_chapter: i64,
    end_verse: i64,
    text: String,
    #[serde(default)]
    topics: Option<Vec<String>>,
}

/// What a load run did
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub books_loaded: usize,
    pub books_skipped: usize,
    pub verses_loaded: usize,
}

/// Load a translation's verses from a JSON file (idempotent)
pub async fn cmd_load(
    store: &ScriptureStore,
    path: &Path,
    translation: &str,
) -> Result<LoadStats> {
    if !is_valid_translation(translation) {
        return Err(Error::Load(format!(
            "Unknown translation code '{}'",
            translation
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    let books: Vec<BookEntry> = serde_json::from_str(&contents)
        .map_err(|e| Error::Load(format!("Invalid verse file {}: {}", path.display(), e)))?;
    if books.is_empty() {
        return Err(Error::Load(format!("No books in {}", path.display())));
    }

    // Positional matching only makes sense for a complete canon in order
    let positional = books.len() == BIBLE_BOOKS.len();
    info!(
        translation,
        books = books.len(),
        positional,
        "Loading verses from {:?}",
        path
    );

    let mut stats = LoadStats::default();
    for (index, entry) in books.iter().enumerate() {
        let Some(book_id) = match_book(entry, index, positional) else {
            warn!(
                name = entry.name.as_deref().unwrap_or("?"),
                abbrev = entry.abbrev.as_deref().unwrap_or("?"),
                "Skipping unrecognized book"
            );
            stats.books_skipped += 1;
            continue;
        };

        for (chapter_index, chapter) in entry.chapters.iter().enumerate() {
            for (verse_index, text) in chapter.iter().enumerate() {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                store
                    .upsert_verse(
                        book_id,
                        chapter_index as i64 + 1,
                        verse_index as i64 + 1,
                        translation,
                        text,
                    )
                    .await?;
                stats.verses_loaded += 1;
            }
        }
        stats.books_loaded += 1;
    }

    info!(
        books = stats.books_loaded,
        skipped = stats.books_skipped,
        verses = stats.verses_loaded,
        "Load complete"
    );
    Ok(stats)
}

/// Load curated passages from a JSON file (idempotent)
pub async fn cmd_load_passages(store: &ScriptureStore, path: &Path) -> Result<usize> {
    let contents = std::fs::read_to_string(path)?;
    let passages: Vec<PassageEntry> = serde_json::from_str(&contents)
        .map_err(|e| Error::Load(format!("Invalid passage file {}: {}", path.display(), e)))?;

    let mut loaded = 0;
    for entry in &passages {
        let book = store.get_book_by_name(&entry.book).await?.ok_or_else(|| {
            Error::Load(format!(
                "Passage '{}' names unknown book '{}'",
                entry.title, entry.book
            ))
        })?;

        let topics = entry.topics.as_ref().map(|t| t.join(", "));
        store
            .insert_passage(
                &entry.title,
                book.id,
                entry.start_chapter,
                entry.start_verse,
                entry.end_chapter,
                entry.end_verse,
                &entry.text,
                topics.as_deref(),
            )
            .await?;
        loaded += 1;
    }

    info!(passages = loaded, "Passage load complete");
    Ok(loaded)
}

/// Resolve a file entry to a canonical book id
fn match_book(entry: &BookEntry, index: usize, positional: bool) -> Option<i64> {
    if let Some(name) = &entry.name {
        let found = BIBLE_BOOKS
            .iter()
            .find(|(n, _, _, _)| n.eq_ignore_ascii_case(name));
        if let Some((_, _, _, position)) = found {
            return Some(*position);
        }
    }
    if let Some(abbrev) = &entry.abbrev {
        let found = BIBLE_BOOKS
            .iter()
            .find(|(_, a, _, _)| a.eq_ignore_ascii_case(abbrev));
        if let Some((_, _, _, position)) = found {
            return Some(*position);
        }
    }
    // Localized names (e.g., "Genesi") fall through to canon order
    positional.then_some(index as i64 + 1)
}

pub fn print_load_stats(stats: &LoadStats, translation: &str) {
    println!(
        "Loaded {} verses across {} books for '{}'",
        stats.verses_loaded, stats.books_loaded, translation
    );
    if stats.books_skipped > 0 {
        println!("Skipped {} unrecognized books", stats.books_skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_store() -> ScriptureStore {
        let store = ScriptureStore::open_in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        store
    }

    fn write_json(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_by_english_name() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            "web.json",
            r#"[{"name": "John", "chapters": [["v1", "v2"], ["c2v1"]]}]"#,
        );

        let stats = cmd_load(&store, &path, "web").await.unwrap();
        assert_eq!(stats.books_loaded, 1);
        assert_eq!(stats.verses_loaded, 3);

        let verse = store.get_verse("John", 2, 1, None).await.unwrap().unwrap();
        assert_eq!(verse.text, "c2v1");
    }

    #[tokio::test]
    async fn test_load_by_abbreviation() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            "kjv.json",
            r#"[{"abbrev": "rev", "chapters": [["the end"]]}]"#,
        );

        let stats = cmd_load(&store, &path, "kjv").await.unwrap();
        assert_eq!(stats.books_loaded, 1);
        let verse = store
            .get_verse("Revelation", 1, 1, Some("kjv"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(verse.text, "the end");
    }

    #[tokio::test]
    async fn test_unknown_book_skipped_when_not_positional() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            "odd.json",
            r#"[{"name": "Genesi", "chapters": [["in principio"]]}]"#,
        );

        let stats = cmd_load(&store, &path, "ita1927").await.unwrap();
        assert_eq!(stats.books_loaded, 0);
        assert_eq!(stats.books_skipped, 1);
        assert_eq!(stats.verses_loaded, 0);
    }

    #[tokio::test]
    async fn test_positional_match_for_full_canon() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();

        // 66 localized books in canon order; names match nothing English
        let books: Vec<String> = (0..66)
            .map(|i| format!(r#"{{"name": "libro {i}", "chapters": [["testo"]]}}"#))
            .collect();
        let path = write_json(&dir, "ita.json", &format!("[{}]", books.join(",")));

        let stats = cmd_load(&store, &path, "ita1927").await.unwrap();
        assert_eq!(stats.books_loaded, 66);
        assert_eq!(stats.verses_loaded, 66);

        let verse = store
            .get_verse("Genesis", 1, 1, Some("ita1927"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(verse.text, "testo");
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            "web.json",
            r#"[{"name": "John", "chapters": [["v1"]]}]"#,
        );

        cmd_load(&store, &path, "web").await.unwrap();
        cmd_load(&store, &path, "web").await.unwrap();
        assert_eq!(store.stats().await.unwrap().verses, 1);
    }

    #[tokio::test]
    async fn test_invalid_translation_rejected() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(&dir, "x.json", "[]");

        let err = cmd_load(&store, &path, "niv").await.unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[tokio::test]
    async fn test_load_passages() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            "passages.json",
            r#"[{
                "title": "The Lord's Prayer",
                "book": "Matthew",
                "start_chapter": 6, "start_verse": 9,
                "end_chapter": 6, "end_verse": 13,
                "text": "Our Father in heaven...",
                "topics": ["prayer", "teaching"]
            }]"#,
        );

        let loaded = cmd_load_passages(&store, &path).await.unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(store.stats().await.unwrap().passages, 1);

        let pending = store.passages_missing_embeddings(10).await.unwrap();
        assert_eq!(pending[0].topics.as_deref(), Some("prayer, teaching"));
    }

    #[tokio::test]
    async fn test_passage_with_unknown_book_fails() {
        let store = test_store().await;
        let dir = TempDir::new().unwrap();
        let path = write_json(
            &dir,
            "bad.json",
            r#"[{
                "title": "Nope", "book": "Atlantis",
                "start_chapter": 1, "start_verse": 1,
                "end_chapter": 1, "end_verse": 2,
                "text": "..."
            }]"#,
        );

        let err = cmd_load_passages(&store, &path).await.unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }
}

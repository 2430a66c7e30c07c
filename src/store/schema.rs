//! SQLite schema definition

/// SQL schema for the scripture database
pub const SCHEMA_SQL: &str = r#"
-- Books: canonical reference data, seeded at init
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    abbreviation TEXT NOT NULL,
    testament TEXT NOT NULL,
    position INTEGER NOT NULL UNIQUE
);

-- Verses: one row per verse per translation
CREATE TABLE IF NOT EXISTS verses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL REFERENCES books(id),
    chapter_number INTEGER NOT NULL,
    verse_number INTEGER NOT NULL,
    translation TEXT NOT NULL,
    text TEXT NOT NULL,
    embedding BLOB,
    UNIQUE(book_id, chapter_number, verse_number, translation)
);

-- Passages: curated multi-verse spans
CREATE TABLE IF NOT EXISTS passages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    start_book_id INTEGER NOT NULL REFERENCES books(id),
    start_chapter INTEGER NOT NULL,
    start_verse INTEGER NOT NULL,
    end_chapter INTEGER NOT NULL,
    end_verse INTEGER NOT NULL,
    text TEXT NOT NULL,
    topics TEXT,
    embedding BLOB,
    UNIQUE(title, start_book_id, start_chapter, start_verse)
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_verses_book_chapter ON verses(book_id, chapter_number);
CREATE INDEX IF NOT EXISTS idx_verses_translation ON verses(translation);
"#;

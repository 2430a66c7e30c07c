//! Scripture data models
//!
//! Books, verses, and curated passages as stored in SQLite. Books are
//! immutable reference data seeded from [`BIBLE_BOOKS`]; verses are
//! bulk-loaded per translation and passages are hand-curated.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A Bible book (e.g., Genesis, Matthew)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    /// 'old' or 'new'
    pub testament: String,
    /// Order in the Bible (1-66)
    pub position: i64,
}

/// An individual verse, tagged with its translation
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Verse {
    pub id: i64,
    pub book_id: i64,
    /// Canonical English book name (joined from books)
    pub book_name: String,
    pub chapter_number: i64,
    pub verse_number: i64,
    pub translation: String,
    pub text: String,
    /// Little-endian f32 embedding blob, populated by the embed pass
    #[serde(skip)]
    pub embedding: Option<Vec<u8>>,
}

impl Verse {
    /// The verse reference with the canonical English book name
    /// (e.g., "John 3:16")
    pub fn reference(&self) -> String {
        format!(
            "{} {}:{}",
            self.book_name, self.chapter_number, self.verse_number
        )
    }
}

/// A curated multi-verse passage (e.g., "The Lord's Prayer")
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Passage {
    pub id: i64,
    pub title: String,
    pub start_book_id: i64,
    /// Canonical English name of the start book (joined from books)
    pub book_name: String,
    pub start_chapter: i64,
    pub start_verse: i64,
    pub end_chapter: i64,
    pub end_verse: i64,
    pub text: String,
    /// Comma-separated topic tags
    pub topics: Option<String>,
    #[serde(skip)]
    pub embedding: Option<Vec<u8>>,
}

impl Passage {
    /// The passage reference (e.g., "Matthew 6:9-13" or "Luke 15:11-24:2")
    pub fn reference(&self) -> String {
        if self.start_chapter == self.end_chapter {
            format!(
                "{} {}:{}-{}",
                self.book_name, self.start_chapter, self.start_verse, self.end_verse
            )
        } else {
            format!(
                "{} {}:{}-{}:{}",
                self.book_name, self.start_chapter, self.start_verse, self.end_chapter,
                self.end_verse
            )
        }
    }

    /// Topic tags split out of the comma-separated column
    pub fn topic_list(&self) -> Option<Vec<String>> {
        self.topics
            .as_ref()
            .map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
    }
}

/// Canonical book metadata: (name, abbreviation, testament, position)
pub static BIBLE_BOOKS: [(&str, &str, &str, i64); 66] = [
    // Old Testament
    ("Genesis", "Gen", "old", 1),
    ("Exodus", "Exod", "old", 2),
    ("Leviticus", "Lev", "old", 3),
    ("Numbers", "Num", "old", 4),
    ("Deuteronomy", "Deut", "old", 5),
    ("Joshua", "Josh", "old", 6),
    ("Judges", "Judg", "old", 7),
    ("Ruth", "Ruth", "old", 8),
    ("1 Samuel", "1Sam", "old", 9),
    ("2 Samuel", "2Sam", "old", 10),
    ("1 Kings", "1Kgs", "old", 11),
    ("2 Kings", "2Kgs", "old", 12),
    ("1 Chronicles", "1Chr", "old", 13),
    ("2 Chronicles", "2Chr", "old", 14),
    ("Ezra", "Ezra", "old", 15),
    ("Nehemiah", "Neh", "old", 16),
    ("Esther", "Esth", "old", 17),
    ("Job", "Job", "old", 18),
    ("Psalms", "Ps", "old", 19),
    ("Proverbs", "Prov", "old", 20),
    ("Ecclesiastes", "Eccl", "old", 21),
    ("Song of Solomon", "Song", "old", 22),
    ("Isaiah", "Isa", "old", 23),
    ("Jeremiah", "Jer", "old", 24),
    ("Lamentations", "Lam", "old", 25),
    ("Ezekiel", "Ezek", "old", 26),
    ("Daniel", "Dan", "old", 27),
    ("Hosea", "Hos", "old", 28),
    ("Joel", "Joel", "old", 29),
    ("Amos", "Amos", "old", 30),
    ("Obadiah", "Obad", "old", 31),
    ("Jonah", "Jonah", "old", 32),
    ("Micah", "Mic", "old", 33),
    ("Nahum", "Nah", "old", 34),
    ("Habakkuk", "Hab", "old", 35),
    ("Zephaniah", "Zeph", "old", 36),
    ("Haggai", "Hag", "old", 37),
    ("Zechariah", "Zech", "old", 38),
    ("Malachi", "Mal", "old", 39),
    // New Testament
    ("Matthew", "Matt", "new", 40),
    ("Mark", "Mark", "new", 41),
    ("Luke", "Luke", "new", 42),
    ("John", "John", "new", 43),
    ("Acts", "Acts", "new", 44),
    ("Romans", "Rom", "new", 45),
    ("1 Corinthians", "1Cor", "new", 46),
    ("2 Corinthians", "2Cor", "new", 47),
    ("Galatians", "Gal", "new", 48),
    ("Ephesians", "Eph", "new", 49),
    ("Philippians", "Phil", "new", 50),
    ("Colossians", "Col", "new", 51),
    ("1 Thessalonians", "1Thess", "new", 52),
    ("2 Thessalonians", "2Thess", "new", 53),
    ("1 Timothy", "1Tim", "new", 54),
    ("2 Timothy", "2Tim", "new", 55),
    ("Titus", "Titus", "new", 56),
    ("Philemon", "Phlm", "new", 57),
    ("Hebrews", "Heb", "new", 58),
    ("James", "Jas", "new", 59),
    ("1 Peter", "1Pet", "new", 60),
    ("2 Peter", "2Pet", "new", 61),
    ("1 John", "1John", "new", 62),
    ("2 John", "2John", "new", 63),
    ("3 John", "3John", "new", 64),
    ("Jude", "Jude", "new", 65),
    ("Revelation", "Rev", "new", 66),
];

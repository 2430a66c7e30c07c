//! Book name localization
//!
//! References shown to the user carry the book name in the language of
//! the translation they came from ("Giovanni 3:16" for Riveduta, not
//! "John 3:16"). Storage always keys on the canonical English name.

/// English -> Italian book names (Riveduta 1927)
static ENGLISH_TO_ITALIAN: [(&str, &str); 66] = [
    ("Genesis", "Genesi"),
    ("Exodus", "Esodo"),
    ("Leviticus", "Levitico"),
    ("Numbers", "Numeri"),
    ("Deuteronomy", "Deuteronomio"),
    ("Joshua", "Giosuè"),
    ("Judges", "Giudici"),
    ("Ruth", "Rut"),
    ("1 Samuel", "1 Samuele"),
    ("2 Samuel", "2 Samuele"),
    ("1 Kings", "1 Re"),
    ("2 Kings", "2 Re"),
    ("1 Chronicles", "1 Cronache"),
    ("2 Chronicles", "2 Cronache"),
    ("Ezra", "Esdra"),
    ("Nehemiah", "Nehemia"),
    ("Esther", "Ester"),
    ("Job", "Giobbe"),
    ("Psalms", "Salmi"),
    ("Proverbs", "Proverbi"),
    ("Ecclesiastes", "Ecclesiaste"),
    ("Song of Solomon", "Cantico dei Cantici"),
    ("Isaiah", "Isaia"),
    ("Jeremiah", "Geremia"),
    ("Lamentations", "Lamentazioni"),
    ("Ezekiel", "Ezechiele"),
    ("Daniel", "Daniele"),
    ("Hosea", "Osea"),
    ("Joel", "Gioele"),
    ("Amos", "Amos"),
    ("Obadiah", "Abdia"),
    ("Jonah", "Giona"),
    ("Micah", "Michea"),
    ("Nahum", "Nahum"),
    ("Habakkuk", "Abacuc"),
    ("Zephaniah", "Sofonia"),
    ("Haggai", "Aggeo"),
    ("Zechariah", "Zaccaria"),
    ("Malachi", "Malachia"),
    ("Matthew", "Matteo"),
    ("Mark", "Marco"),
    ("Luke", "Luca"),
    ("John", "Giovanni"),
    ("Acts", "Atti"),
    ("Romans", "Romani"),
    ("1 Corinthians", "1 Corinzi"),
    ("2 Corinthians", "2 Corinzi"),
    ("Galatians", "Galati"),
    ("Ephesians", "Efesini"),
    ("Philippians", "Filippesi"),
    ("Colossians", "Colossesi"),
    ("1 Thessalonians", "1 Tessalonicesi"),
    ("2 Thessalonians", "2 Tessalonicesi"),
    ("1 Timothy", "1 Timoteo"),
    ("2 Timothy", "2 Timoteo"),
    ("Titus", "Tito"),
    ("Philemon", "Filemone"),
    ("Hebrews", "Ebrei"),
    ("James", "Giacomo"),
    ("1 Peter", "1 Pietro"),
    ("2 Peter", "2 Pietro"),
    ("1 John", "1 Giovanni"),
    ("2 John", "2 Giovanni"),
    ("3 John", "3 Giovanni"),
    ("Jude", "Giuda"),
    ("Revelation", "Apocalisse"),
];

/// English -> German book names (Schlachter 1951)
static ENGLISH_TO_GERMAN: [(&str, &str); 66] = [
    ("Genesis", "1. Mose"),
    ("Exodus", "2. Mose"),
    ("Leviticus", "3. Mose"),
    ("Numbers", "4. Mose"),
    ("Deuteronomy", "5. Mose"),
    ("Joshua", "Josua"),
    ("Judges", "Richter"),
    ("Ruth", "Ruth"),
    ("1 Samuel", "1. Samuel"),
    ("2 Samuel", "2. Samuel"),
    ("1 Kings", "1. Könige"),
    ("2 Kings", "2. Könige"),
    ("1 Chronicles", "1. Chronik"),
    ("2 Chronicles", "2. Chronik"),
    ("Ezra", "Esra"),
    ("Nehemiah", "Nehemia"),
    ("Esther", "Esther"),
    ("Job", "Hiob"),
    ("Psalms", "Psalmen"),
    ("Proverbs", "Sprüche"),
    ("Ecclesiastes", "Prediger"),
    ("Song of Solomon", "Hohelied"),
    ("Isaiah", "Jesaja"),
    ("Jeremiah", "Jeremia"),
    ("Lamentations", "Klagelieder"),
    ("Ezekiel", "Hesekiel"),
    ("Daniel", "Daniel"),
    ("Hosea", "Hosea"),
    ("Joel", "Joel"),
    ("Amos", "Amos"),
    ("Obadiah", "Obadja"),
    ("Jonah", "Jona"),
    ("Micah", "Micha"),
    ("Nahum", "Nahum"),
    ("Habakkuk", "Habakuk"),
    ("Zephaniah", "Zephanja"),
    ("Haggai", "Haggai"),
    ("Zechariah", "Sacharja"),
    ("Malachi", "Maleachi"),
    ("Matthew", "Matthäus"),
    ("Mark", "Markus"),
    ("Luke", "Lukas"),
    ("John", "Johannes"),
    ("Acts", "Apostelgeschichte"),
    ("Romans", "Römer"),
    ("1 Corinthians", "1. Korinther"),
    ("2 Corinthians", "2. Korinther"),
    ("Galatians", "Galater"),
    ("Ephesians", "Epheser"),
    ("Philippians", "Philipper"),
    ("Colossians", "Kolosser"),
    ("1 Thessalonians", "1. Thessalonicher"),
    ("2 Thessalonians", "2. Thessalonicher"),
    ("1 Timothy", "1. Timotheus"),
    ("2 Timothy", "2. Timotheus"),
    ("Titus", "Titus"),
    ("Philemon", "Philemon"),
    ("Hebrews", "Hebräer"),
    ("James", "Jakobus"),
    ("1 Peter", "1. Petrus"),
    ("2 Peter", "2. Petrus"),
    ("1 John", "1. Johannes"),
    ("2 John", "2. Johannes"),
    ("3 John", "3. Johannes"),
    ("Jude", "Judas"),
    ("Revelation", "Offenbarung"),
];

/// Localize a canonical English book name for a translation
///
/// English translations and unknown translation codes keep the English
/// name; an unmapped book name also passes through unchanged.
pub fn localize_book_name(english_name: &str, translation_code: &str) -> String {
    let table: &[(&str, &str)] = match translation_code {
        "ita1927" => &ENGLISH_TO_ITALIAN,
        "schlachter" => &ENGLISH_TO_GERMAN,
        _ => return english_name.to_string(),
    };

    table
        .iter()
        .find(|(en, _)| *en == english_name)
        .map(|(_, localized)| localized.to_string())
        .unwrap_or_else(|| english_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BIBLE_BOOKS;

    #[test]
    fn test_localizes_italian_and_german() {
        assert_eq!(localize_book_name("John", "ita1927"), "Giovanni");
        assert_eq!(localize_book_name("Psalms", "ita1927"), "Salmi");
        assert_eq!(localize_book_name("John", "schlachter"), "Johannes");
        assert_eq!(localize_book_name("Genesis", "schlachter"), "1. Mose");
    }

    #[test]
    fn test_english_translations_pass_through() {
        assert_eq!(localize_book_name("John", "web"), "John");
        assert_eq!(localize_book_name("John", "kjv"), "John");
        assert_eq!(localize_book_name("John", "not-a-translation"), "John");
    }

    #[test]
    fn test_unmapped_name_passes_through() {
        assert_eq!(localize_book_name("Atlantis", "ita1927"), "Atlantis");
    }

    #[test]
    fn test_tables_cover_every_canonical_book() {
        for (name, _, _, _) in BIBLE_BOOKS {
            assert!(
                ENGLISH_TO_ITALIAN.iter().any(|(en, _)| *en == name),
                "missing Italian mapping for {name}"
            );
            assert!(
                ENGLISH_TO_GERMAN.iter().any(|(en, _)| *en == name),
                "missing German mapping for {name}"
            );
        }
    }

    #[test]
    fn test_localized_names_are_unique() {
        for table in [&ENGLISH_TO_ITALIAN, &ENGLISH_TO_GERMAN] {
            let mut seen = std::collections::HashSet::new();
            for (_, localized) in table {
                assert!(seen.insert(localized), "duplicate localized name {localized}");
            }
        }
    }
}

//! Scripture context construction
//!
//! Turns search results into the allow-list block prepended to the system
//! prompt. The framing is deliberately restrictive: the model may only
//! cite what appears between the ALLOWED VERSES markers, and an empty
//! result set produces an explicit no-citation instruction instead of
//! silence.

use crate::search::{PassageResult, VerseResult};

/// Passage text longer than this is truncated in the prompt
const MAX_PASSAGE_CHARS: usize = 500;

/// Build the scripture context block for a set of search results
///
/// Every reference and verse text in the output comes verbatim from the
/// inputs; nothing else scripture-shaped is ever added.
pub fn build_scripture_context(verses: &[VerseResult], passages: &[PassageResult]) -> String {
    if verses.is_empty() && passages.is_empty() {
        return "\
## Scripture Context
**No relevant verses were found for this query.**
**DO NOT quote any Bible verses. Provide general spiritual encouragement only.**
---
"
        .to_string();
    }

    let mut parts = Vec::new();

    if !verses.is_empty() {
        parts.push("## Relevant Verses Found".to_string());
        for v in verses {
            parts.push(format!("**{}**: \"{}\"", v.reference, v.text));
        }
    }

    if !passages.is_empty() {
        parts.push("\n## Relevant Passages Found".to_string());
        for p in passages {
            parts.push(format!("**{}** ({})", p.title, p.reference));
            parts.push(format!("\"{}\"", truncate_chars(&p.text, MAX_PASSAGE_CHARS)));
        }
    }

    let listing = parts.join("\n");
    format!(
        "\
## Scripture Context - ONLY USE THESE VERSES
**CRITICAL: The verses below are the ONLY Bible verses you are allowed to mention.**
**DO NOT reference ANY verse not on this list, no matter how well-known it is.**

### ALLOWED VERSES:
{listing}

### END OF ALLOWED VERSES
If none of these verses fit the user's situation, provide supportive words WITHOUT quoting any scripture.
---
"
    )
}

/// Truncate to a maximum number of characters, appending "..." if cut
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(reference: &str, text: &str) -> VerseResult {
        VerseResult {
            reference: reference.to_string(),
            text: text.to_string(),
            book: "John".to_string(),
            chapter: 3,
            verse: 16,
            translation: Some("web".to_string()),
            similarity: Some(0.92),
        }
    }

    fn passage(title: &str, reference: &str, text: &str) -> PassageResult {
        PassageResult {
            title: title.to_string(),
            reference: reference.to_string(),
            text: text.to_string(),
            topics: None,
            similarity: Some(0.88),
        }
    }

    #[test]
    fn test_empty_results_forbid_citation() {
        let context = build_scripture_context(&[], &[]);
        assert!(context.contains("## Scripture Context"));
        assert!(context.contains("No relevant verses were found"));
        assert!(context.contains("DO NOT quote any Bible verses"));
        assert!(!context.contains("ALLOWED VERSES"));
    }

    #[test]
    fn test_verses_appear_verbatim_inside_allow_list() {
        let verses = vec![verse("John 3:16", "For God so loved the world...")];
        let context = build_scripture_context(&verses, &[]);

        assert!(context.contains("**John 3:16**: \"For God so loved the world...\""));
        assert!(context.contains("### ALLOWED VERSES:"));
        assert!(context.contains("### END OF ALLOWED VERSES"));
        // The constraint brackets the listing on both sides
        let before = context.find("ONLY Bible verses you are allowed").unwrap();
        let listing = context.find("John 3:16").unwrap();
        let after = context.find("WITHOUT quoting any scripture").unwrap();
        assert!(before < listing && listing < after);
    }

    #[test]
    fn test_no_references_beyond_input() {
        let verses = vec![verse("John 3:16", "For God so loved the world...")];
        let context = build_scripture_context(&verses, &[]);
        // A famously quotable reference that was NOT retrieved must not appear
        assert!(!context.contains("Romans 8:28"));
        assert!(!context.contains("Psalm 23"));
    }

    #[test]
    fn test_passage_formatting_and_truncation() {
        let long_text = "a".repeat(600);
        let passages = vec![passage("The Lord's Prayer", "Matthew 6:9-13", &long_text)];
        let context = build_scripture_context(&[], &passages);

        assert!(context.contains("**The Lord's Prayer** (Matthew 6:9-13)"));
        let quoted = format!("\"{}...\"", "a".repeat(500));
        assert!(context.contains(&quoted));
        assert!(!context.contains(&"a".repeat(501)));
    }

    #[test]
    fn test_short_passage_not_truncated() {
        let passages = vec![passage("Creation", "Genesis 1:1-2:3", "In the beginning")];
        let context = build_scripture_context(&[], &passages);
        assert!(context.contains("\"In the beginning\""));
        assert!(!context.contains("In the beginning..."));
    }
}

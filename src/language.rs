//! Language detection and translation resolution
//!
//! Maps free-text user input to one of the supported Bible translations.
//! Detection uses whatlang; anything too short or too ambiguous to call
//! falls back to the configured base language rather than guessing.

use tracing::debug;
use whatlang::Lang;

/// Translation used when nothing better can be resolved
pub const DEFAULT_TRANSLATION: &str = "web";

/// Inputs shorter than this are not worth running detection on
const MIN_DETECTION_LEN: usize = 10;

/// Metadata for one supported Bible translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationInfo {
    /// Stable identifier used in the database and config (e.g., "web")
    pub code: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub language: &'static str,
    /// ISO 639-1 language code
    pub language_code: &'static str,
    /// Default translation for its language
    pub is_default: bool,
}

/// All supported translations
pub static TRANSLATIONS: [TranslationInfo; 4] = [
    TranslationInfo {
        code: "web",
        name: "World English Bible",
        short_name: "WEB",
        language: "English",
        language_code: "en",
        is_default: true,
    },
    TranslationInfo {
        code: "kjv",
        name: "King James Version",
        short_name: "KJV",
        language: "English",
        language_code: "en",
        is_default: false,
    },
    TranslationInfo {
        code: "ita1927",
        name: "Riveduta Bibbia 1927",
        short_name: "Riveduta 1927",
        language: "Italian",
        language_code: "it",
        is_default: true,
    },
    TranslationInfo {
        code: "schlachter",
        name: "Schlachter Bibel 1951",
        short_name: "Schlachter 1951",
        language: "German",
        language_code: "de",
        is_default: true,
    },
];

/// Detect the language of user input, returning an ISO 639-1 code where
/// one exists ("en", "it", "de", ...)
///
/// Short inputs ("Hi", "John 3:16") are assumed to be in the deployment's
/// base language: detection noise on a few characters would otherwise
/// flip translations mid-chat. Detection failures fall back the same way.
pub fn detect_language(text: &str, base_language: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() < MIN_DETECTION_LEN {
        return base_language.to_string();
    }

    let Some(info) = whatlang::detect(trimmed) else {
        return base_language.to_string();
    };

    let code = match info.lang() {
        Lang::Eng => "en",
        Lang::Ita => "it",
        Lang::Deu => "de",
        other => other.code(),
    };
    debug!(language = code, confidence = info.confidence(), "Detected language");
    code.to_string()
}

/// Resolve which translation to use for a message
///
/// A valid explicit preference always wins; otherwise the default
/// translation for the detected language; otherwise the global default.
pub fn resolve_translation(preferred: Option<&str>, language_code: &str) -> String {
    if let Some(code) = preferred {
        if is_valid_translation(code) {
            return code.to_string();
        }
        debug!(code, "Ignoring unknown preferred translation");
    }

    TRANSLATIONS
        .iter()
        .find(|t| t.language_code == language_code && t.is_default)
        .map(|t| t.code.to_string())
        .unwrap_or_else(|| DEFAULT_TRANSLATION.to_string())
}

/// Metadata for a translation code, if supported
pub fn translation_info(code: &str) -> Option<&'static TranslationInfo> {
    TRANSLATIONS.iter().find(|t| t.code == code)
}

/// Whether a translation code is supported
pub fn is_valid_translation(code: &str) -> bool {
    translation_info(code).is_some()
}

/// All translations available for a language
pub fn translations_for_language(language_code: &str) -> Vec<&'static TranslationInfo> {
    TRANSLATIONS
        .iter()
        .filter(|t| t.language_code == language_code)
        .collect()
}

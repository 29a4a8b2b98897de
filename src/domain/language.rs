//! Language codes and the selectable language catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a language in the catalog (e.g. `en`, `x-jat`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// One selectable entry: code plus human readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: LanguageCode,
    pub label: String,
}

/// Ordered mapping from language code to display label.
///
/// Iteration order is the order checkboxes are rendered in. The catalog is
/// built once at start-up and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageCatalog {
    entries: Vec<CatalogEntry>,
}

/// Languages offered when no catalog file is configured.
const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("x-main", "Main (original title)"),
    ("x-jat", "Romaji (Japanese)"),
    ("x-zht", "Pinyin (Chinese)"),
    ("x-kot", "Romanized (Korean)"),
    ("x-tht", "Romanized (Thai)"),
    ("en", "English"),
    ("ja", "Japanese"),
    ("zh", "Chinese"),
    ("zh-hans", "Chinese (Simplified)"),
    ("zh-hant", "Chinese (Traditional)"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("lt", "Lithuanian"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("pt-br", "Portuguese (Brazilian)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
];

impl LanguageCatalog {
    /// Builds a catalog from entries, keeping the first label seen for a code.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            if catalog.label(&entry.code).is_none() {
                catalog.entries.push(entry);
            }
        }
        catalog
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_LANGUAGES.iter().map(|(code, label)| CatalogEntry {
            code: LanguageCode::from(*code),
            label: (*label).to_string(),
        }))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn label(&self, code: &LanguageCode) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.code == code)
            .map(|e| e.label.as_str())
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.label(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

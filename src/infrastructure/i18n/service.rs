use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Language metadata loaded from JSON
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

/// Translation data loaded from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationData {
    pub language: LanguageInfo,
    pub ui: HashMap<String, String>,
}

/// Translates the UI chrome (headers, buttons, status lines).
///
/// Catalog labels are shown as configured and never go through this service.
pub struct I18nService {
    current_language: String,
    translations: HashMap<String, TranslationData>,
    available_languages: Vec<LanguageInfo>,
}

impl I18nService {
    /// Auto-discovers translation files in `translations/`
    pub fn new() -> Self {
        Self::from_dir(Path::new("translations"))
    }

    /// Auto-discovers all `.json` translation files in `dir`
    pub fn from_dir(dir: &Path) -> Self {
        let mut translations = HashMap::new();
        let mut available_languages = Vec::new();

        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|s| s.to_str()) != Some("json") {
                        continue;
                    }
                    let parsed = std::fs::read_to_string(&path)
                        .map_err(anyhow::Error::from)
                        .and_then(|json| {
                            serde_json::from_str::<TranslationData>(&json).map_err(Into::into)
                        });
                    match parsed {
                        Ok(data) => {
                            available_languages.push(data.language.clone());
                            translations.insert(data.language.code.clone(), data);
                        }
                        Err(e) => warn!("Skipping translation file {:?}: {}", path, e),
                    }
                }
            }
            Err(e) => warn!("No translations loaded from {:?}: {}", dir, e),
        }

        // Sort languages by code for consistency
        available_languages.sort_by(|a, b| a.code.cmp(&b.code));

        let default_lang = available_languages
            .iter()
            .find(|l| l.code == "en")
            .or_else(|| available_languages.first())
            .map(|l| l.code.clone())
            .unwrap_or_else(|| "en".to_string());

        Self {
            current_language: default_lang,
            translations,
            available_languages,
        }
    }

    pub fn available_languages(&self) -> &[LanguageInfo] {
        &self.available_languages
    }

    /// Set current language by code
    pub fn set_language(&mut self, language_code: &str) -> bool {
        if self.translations.contains_key(language_code) {
            self.current_language = language_code.to_string();
            true
        } else {
            false
        }
    }

    pub fn current_language_code(&self) -> &str {
        &self.current_language
    }

    /// Translate a UI key, falling back to the key itself
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations
            .get(&self.current_language)
            .and_then(|data| data.ui.get(key))
            .map(|s| s.as_str())
            .unwrap_or(key)
    }

    /// Translate with format parameters
    /// Usage: i18n.tf("languages_header", &[("scope", "Series")])
    /// Template in JSON: "{scope} Languages"
    pub fn tf(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut result = self.t(key).to_string();

        for (placeholder, value) in params {
            result = result.replace(&format!("{{{}}}", placeholder), value);
        }

        result
    }
}

impl Default for I18nService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_discovery() {
        let i18n = I18nService::new();
        // Should auto-discover at least English and French
        assert!(i18n.available_languages().len() >= 2);
        assert_eq!(i18n.current_language_code(), "en");
    }

    #[test]
    fn test_header_template() {
        let mut i18n = I18nService::new();
        assert_eq!(
            i18n.tf("languages_header", &[("scope", "Series")]),
            "Series Languages"
        );

        assert!(i18n.set_language("fr"));
        assert_eq!(
            i18n.tf("languages_header", &[("scope", "Episode")]),
            "Langues (Episode)"
        );
    }

    #[test]
    fn test_missing_directory_falls_back_to_keys() {
        let mut i18n = I18nService::from_dir(Path::new("does-not-exist"));
        assert!(i18n.available_languages().is_empty());
        assert!(!i18n.set_language("fr"));
        assert_eq!(i18n.t("save"), "save");
    }
}

use crate::domain::preferences::{PreferenceList, PreferenceScope};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Settings object owned by the settings store.
///
/// Only the two language preference lists are modelled. Every other field
/// is carried through untouched so that a patch never drops data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "LanguagePreference", default)]
    pub language_preference: PreferenceList,
    #[serde(rename = "EpisodeLanguagePreference", default)]
    pub episode_language_preference: PreferenceList,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Settings {
    pub fn preference(&self, scope: PreferenceScope) -> &PreferenceList {
        match scope {
            PreferenceScope::Series => &self.language_preference,
            PreferenceScope::Episode => &self.episode_language_preference,
        }
    }

    /// Copy of these settings with the list for `scope` replaced
    pub fn with_preference(&self, scope: PreferenceScope, list: PreferenceList) -> Self {
        let mut updated = self.clone();
        match scope {
            PreferenceScope::Series => updated.language_preference = list,
            PreferenceScope::Episode => updated.episode_language_preference = list,
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "LanguagePreference": ["x-jat", "en"],
            "EpisodeLanguagePreference": ["en"],
            "AutoGroupSeries": true,
            "Plex": { "Server": "localhost" }
        });
        let settings: Settings = serde_json::from_value(raw.clone()).expect("valid settings");
        assert_eq!(settings.language_preference.len(), 2);
        assert_eq!(serde_json::to_value(&settings).expect("serializable"), raw);
    }

    #[test]
    fn test_with_preference_replaces_only_active_scope() {
        let settings = Settings {
            language_preference: ["en"].into_iter().collect(),
            episode_language_preference: ["ja"].into_iter().collect(),
            other: Map::new(),
        };
        let updated =
            settings.with_preference(PreferenceScope::Series, ["en", "fr"].into_iter().collect());
        assert_eq!(updated.preference(PreferenceScope::Series).len(), 2);
        assert_eq!(
            updated.preference(PreferenceScope::Episode),
            settings.preference(PreferenceScope::Episode)
        );
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let settings: Settings = serde_json::from_str("{}").expect("valid settings");
        assert!(settings.preference(PreferenceScope::Episode).is_empty());
    }
}

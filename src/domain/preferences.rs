//! Preference scopes and the ordered preference list.

use crate::domain::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which preference list is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceScope {
    Series,
    Episode,
}

impl PreferenceScope {
    pub const ALL: [PreferenceScope; 2] = [PreferenceScope::Series, PreferenceScope::Episode];

    /// Name of the settings field this scope is persisted under
    pub fn settings_field(&self) -> &'static str {
        match self {
            PreferenceScope::Series => "LanguagePreference",
            PreferenceScope::Episode => "EpisodeLanguagePreference",
        }
    }
}

impl fmt::Display for PreferenceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PreferenceScope::Series => "Series",
            PreferenceScope::Episode => "Episode",
        })
    }
}

impl FromStr for PreferenceScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "series" => Ok(PreferenceScope::Series),
            "episode" => Ok(PreferenceScope::Episode),
            _ => anyhow::bail!("Invalid scope: {}. Must be 'series' or 'episode'", s),
        }
    }
}

/// Ordered list of preferred languages.
///
/// Mutations never introduce a duplicate. A list deserialized from the store
/// is kept exactly as stored, so `remove` drops every occurrence of a code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceList(Vec<LanguageCode>);

impl PreferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &LanguageCode) -> bool {
        self.0.contains(code)
    }

    /// Appends `code` unless already present. Returns whether the list changed.
    pub fn insert(&mut self, code: LanguageCode) -> bool {
        if self.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    /// Removes all occurrences of `code`. Returns whether the list changed.
    pub fn remove(&mut self, code: &LanguageCode) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != code);
        self.0.len() != before
    }

    /// Brings membership of `code` in line with `checked`.
    pub fn toggle(&mut self, code: &LanguageCode, checked: bool) -> bool {
        if checked {
            self.insert(code.clone())
        } else {
            self.remove(code)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PreferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.0.iter().map(|c| c.as_str()).collect();
        write!(f, "[{}]", codes.join(", "))
    }
}

/// Collecting keeps the first occurrence of each code.
impl FromIterator<LanguageCode> for PreferenceList {
    fn from_iter<I: IntoIterator<Item = LanguageCode>>(iter: I) -> Self {
        let mut list = Self::new();
        for code in iter {
            list.insert(code);
        }
        list
    }
}

impl<'a> FromIterator<&'a str> for PreferenceList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(LanguageCode::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &PreferenceList) -> Vec<&str> {
        list.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn test_insert_appends_in_click_order() {
        let mut list: PreferenceList = ["fr"].into_iter().collect();
        assert!(list.insert("ja".into()));
        assert!(list.insert("en".into()));
        assert_eq!(codes(&list), vec!["fr", "ja", "en"]);
    }

    #[test]
    fn test_toggle_on_is_idempotent() {
        let mut list: PreferenceList = ["en"].into_iter().collect();
        assert!(!list.toggle(&"en".into(), true));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_drops_every_occurrence() {
        let mut list: PreferenceList =
            serde_json::from_str(r#"["en", "ja", "en"]"#).expect("valid json");
        assert_eq!(list.len(), 3);
        assert!(list.toggle(&"en".into(), false));
        assert_eq!(codes(&list), vec!["ja"]);
        assert!(!list.toggle(&"en".into(), false));
    }

    #[test]
    fn test_collect_deduplicates() {
        let list: PreferenceList = ["en", "ja", "en"].into_iter().collect();
        assert_eq!(codes(&list), vec!["en", "ja"]);
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("Series".parse::<PreferenceScope>().unwrap(), PreferenceScope::Series);
        assert_eq!("episode".parse::<PreferenceScope>().unwrap(), PreferenceScope::Episode);
        assert!("movie".parse::<PreferenceScope>().is_err());
    }
}

//! Configuration module for langprefs.
//!
//! Configuration is loaded from environment variables (after `.env` has been
//! applied by the binaries). Every field has a default.

use crate::domain::language::LanguageCatalog;
use crate::infrastructure::FileSettingsStore;
use crate::infrastructure::catalog_loader::load_catalog;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

pub const SETTINGS_PATH_VAR: &str = "LANGPREFS_SETTINGS_PATH";
pub const CATALOG_PATH_VAR: &str = "LANGPREFS_CATALOG_PATH";
pub const UI_LANGUAGE_VAR: &str = "LANGPREFS_UI_LANGUAGE";
pub const TRANSLATIONS_DIR_VAR: &str = "LANGPREFS_TRANSLATIONS_DIR";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Settings file; `None` means `~/.langprefs/settings.json`
    pub settings_path: Option<PathBuf>,
    /// TOML catalog replacing the built-in language list
    pub catalog_path: Option<PathBuf>,
    pub ui_language: String,
    pub translations_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            catalog_path: None,
            ui_language: "en".to_string(),
            translations_dir: PathBuf::from("translations"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            settings_path: non_empty(SETTINGS_PATH_VAR).map(PathBuf::from),
            catalog_path: non_empty(CATALOG_PATH_VAR).map(PathBuf::from),
            ui_language: non_empty(UI_LANGUAGE_VAR).unwrap_or(defaults.ui_language),
            translations_dir: non_empty(TRANSLATIONS_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.translations_dir),
        }
    }

    pub fn resolve_settings_path(&self) -> Result<PathBuf> {
        match &self.settings_path {
            Some(path) => Ok(path.clone()),
            None => FileSettingsStore::default_path(),
        }
    }

    /// Catalog from `catalog_path`, or the built-in one
    pub fn load_catalog(&self) -> Result<LanguageCatalog> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(LanguageCatalog::builtin()),
        }
    }
}

//! Loads a language catalog from a TOML file.
//!
//! ```toml
//! [[languages]]
//! code = "x-jat"
//! label = "Romaji (Japanese)"
//! ```

use crate::domain::language::{CatalogEntry, LanguageCatalog};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    languages: Vec<CatalogEntry>,
}

pub fn parse_catalog(content: &str) -> Result<LanguageCatalog> {
    let file: CatalogFile = toml::from_str(content).context("Failed to parse catalog TOML")?;
    ensure!(
        !file.languages.is_empty(),
        "Catalog must list at least one language"
    );
    Ok(LanguageCatalog::new(file.languages))
}

pub fn load_catalog(path: &Path) -> Result<LanguageCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {:?}", path))?;
    let catalog = parse_catalog(&content)?;
    info!("Loaded {} catalog languages from {:?}", catalog.len(), path);
    Ok(catalog)
}

use crate::domain::ports::SettingsStore;
use crate::domain::settings::Settings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

/// Settings store backed by a JSON file.
///
/// The file is read once by `load`; every successful `patch` rewrites it
/// atomically and publishes the new value to subscribers.
pub struct FileSettingsStore {
    file_path: PathBuf,
    settings_tx: watch::Sender<Option<Settings>>,
}

impl FileSettingsStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        let (settings_tx, _) = watch::channel(None);
        Self {
            file_path: file_path.into(),
            settings_tx,
        }
    }

    /// `~/.langprefs/settings.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Could not find HOME directory")?;
        Ok(PathBuf::from(home).join(".langprefs").join("settings.json"))
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Reads the settings file and publishes it. A missing file yields defaults.
    pub async fn load(&self) -> Result<Settings> {
        let settings = if tokio::fs::try_exists(&self.file_path)
            .await
            .context("Failed to check settings file")?
        {
            let content = tokio::fs::read_to_string(&self.file_path)
                .await
                .context("Failed to read settings file")?;
            let settings: Settings =
                serde_json::from_str(&content).context("Failed to parse settings JSON")?;
            info!("Loaded settings from {:?}", self.file_path);
            settings
        } else {
            info!(
                "No settings file at {:?}, starting from defaults",
                self.file_path
            );
            Settings::default()
        };

        self.settings_tx.send_replace(Some(settings.clone()));
        Ok(settings)
    }

    async fn write(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.file_path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir)
                .await
                .context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .context("Failed to write temp settings file")?;
        tokio::fs::rename(&temp_path, &self.file_path)
            .await
            .context("Failed to rename settings file")?;

        info!("Saved settings to {:?}", self.file_path);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    fn snapshot(&self) -> Option<Settings> {
        self.settings_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Settings>> {
        self.settings_tx.subscribe()
    }

    async fn patch(&self, settings: Settings) -> Result<()> {
        self.write(&settings).await?;
        self.settings_tx.send_replace(Some(settings));
        Ok(())
    }
}

use crate::domain::settings::Settings;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;

/// External store owning the application settings.
///
/// Reads are synchronous snapshots. Changes are observed through a watch
/// channel; `None` means settings have not been loaded yet.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    fn snapshot(&self) -> Option<Settings>;

    fn subscribe(&self) -> watch::Receiver<Option<Settings>>;

    /// Replaces the stored settings. Last write wins.
    async fn patch(&self, settings: Settings) -> Result<()>;
}

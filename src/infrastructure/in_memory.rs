//! In-Memory Settings Store
//!
//! Thread-safe implementation of `SettingsStore` that keeps settings in a
//! watch channel. Used by tests, the headless CLI in dry-run mode, and as the
//! fallback when no settings file can be resolved.
//!
//! # Features
//!
//! - **Failure injection**: `fail_next` makes the next patch report an error
//! - **Latency**: optional delay before a patch completes
//! - **Counting**: `patch_count` reports how many patches were attempted

use crate::domain::ports::SettingsStore;
use crate::domain::settings::Settings;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

pub struct InMemorySettingsStore {
    settings_tx: watch::Sender<Option<Settings>>,
    patch_count: AtomicUsize,
    next_failure: Mutex<Option<String>>,
    latency: Option<Duration>,
}

impl InMemorySettingsStore {
    /// Store with settings already loaded
    pub fn new(settings: Settings) -> Self {
        Self::with_state(Some(settings))
    }

    /// Store whose settings have not arrived yet
    pub fn unloaded() -> Self {
        Self::with_state(None)
    }

    fn with_state(settings: Option<Settings>) -> Self {
        let (settings_tx, _) = watch::channel(settings);
        Self {
            settings_tx,
            patch_count: AtomicUsize::new(0),
            next_failure: Mutex::new(None),
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replaces the settings from outside (e.g. a refetch), notifying subscribers
    pub fn set(&self, settings: Settings) {
        self.settings_tx.send_replace(Some(settings));
    }

    /// Makes the next patch fail with `reason`
    pub fn fail_next(&self, reason: impl Into<String>) {
        let mut slot = self
            .next_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(reason.into());
    }

    pub fn patch_count(&self) -> usize {
        self.patch_count.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> Option<String> {
        self.next_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    fn snapshot(&self) -> Option<Settings> {
        self.settings_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Settings>> {
        self.settings_tx.subscribe()
    }

    async fn patch(&self, settings: Settings) -> Result<()> {
        self.patch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(reason) = self.take_failure() {
            warn!("In-memory settings patch rejected: {}", reason);
            bail!(reason);
        }

        debug!("In-memory settings patched");
        self.settings_tx.send_replace(Some(settings));
        Ok(())
    }
}

//! Language preference editor.
//!
//! Holds the draft selection behind the languages dialog. The draft is copied
//! from the settings store whenever the dialog opens for a scope, or when the
//! stored list for the open scope changes. Saving writes the draft back through
//! the store on the tokio runtime. The result is picked up by `poll` (UI hosts)
//! or `settle` (headless hosts).

use crate::domain::errors::PreferenceError;
use crate::domain::language::LanguageCode;
use crate::domain::ports::SettingsStore;
use crate::domain::preferences::{PreferenceList, PreferenceScope};
use crate::domain::settings::Settings;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

/// Invoked when the dialog closes itself (Discard, or a successful Save)
pub type CloseHandler = Box<dyn FnMut() + Send>;

type SaveResult = Result<(), PreferenceError>;

struct PendingSave {
    session: u64,
    rx: oneshot::Receiver<SaveResult>,
}

pub struct LanguagePreferenceEditor {
    store: Arc<dyn SettingsStore>,
    settings_rx: watch::Receiver<Option<Settings>>,
    runtime: Handle,
    on_close: CloseHandler,

    scope: Option<PreferenceScope>,
    /// Incremented on every open; ties a save result to the dialog that issued it
    session: u64,
    draft: PreferenceList,
    /// Store value the draft was last copied from
    source: Option<PreferenceList>,
    pending: Option<PendingSave>,
    last_error: Option<PreferenceError>,
}

impl LanguagePreferenceEditor {
    /// Subscribes to `store`; the subscription lives as long as the editor.
    pub fn new(
        store: Arc<dyn SettingsStore>,
        runtime: Handle,
        on_close: impl FnMut() + Send + 'static,
    ) -> Self {
        let settings_rx = store.subscribe();
        Self {
            store,
            settings_rx,
            runtime,
            on_close: Box::new(on_close),
            scope: None,
            session: 0,
            draft: PreferenceList::new(),
            source: None,
            pending: None,
            last_error: None,
        }
    }

    pub fn scope(&self) -> Option<PreferenceScope> {
        self.scope
    }

    pub fn is_open(&self) -> bool {
        self.scope.is_some()
    }

    pub fn draft(&self) -> &PreferenceList {
        &self.draft
    }

    pub fn is_checked(&self, code: &LanguageCode) -> bool {
        self.draft.contains(code)
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn settings_loaded(&self) -> bool {
        self.settings_rx.borrow().is_some()
    }

    pub fn last_error(&self) -> Option<&PreferenceError> {
        self.last_error.as_ref()
    }

    /// Stored list for the open scope, `None` while closed or not loaded
    pub fn active_preference_list(&self) -> Option<PreferenceList> {
        let scope = self.scope?;
        self.settings_rx
            .borrow()
            .as_ref()
            .map(|settings| settings.preference(scope).clone())
    }

    /// Host-driven scope change. Opening for a scope always starts a fresh draft.
    pub fn set_scope(&mut self, scope: Option<PreferenceScope>) {
        if scope == self.scope {
            return;
        }
        self.scope = scope;

        let Some(scope) = scope else {
            debug!("Language editor hidden");
            return;
        };

        self.session += 1;
        self.source = None;
        self.draft = PreferenceList::new();
        self.last_error = None;
        info!(%scope, "Opening language editor");
        self.sync_with_store();
    }

    pub fn open(&mut self, scope: PreferenceScope) {
        self.set_scope(Some(scope));
    }

    /// Hides the dialog without notifying the close handler
    pub fn close(&mut self) {
        self.set_scope(None);
    }

    /// Adds `code` when checked and absent, removes every occurrence when unchecked.
    ///
    /// Refused while a save is in flight: the patch already holds the draft.
    pub fn toggle(&mut self, code: &LanguageCode, checked: bool) -> bool {
        if self.scope.is_none() {
            debug!(%code, "Ignoring toggle while editor is closed");
            return false;
        }
        if self.pending.is_some() {
            debug!(%code, "Ignoring toggle while a save is in flight");
            return false;
        }
        let changed = self.draft.toggle(code, checked);
        if changed {
            debug!(%code, checked, draft = %self.draft, "Draft updated");
        }
        changed
    }

    pub fn can_save(&self) -> bool {
        self.scope.is_some()
            && !self.draft.is_empty()
            && self.pending.is_none()
            && self.settings_loaded()
    }

    /// Writes the draft for the open scope back to the store.
    ///
    /// Returns once the write is issued; its outcome arrives through
    /// `poll` or `settle`.
    pub fn save(&mut self) -> Result<(), PreferenceError> {
        let scope = self.scope.ok_or(PreferenceError::NotOpen)?;
        if self.pending.is_some() {
            return Err(PreferenceError::SaveInFlight);
        }
        if self.draft.is_empty() {
            return Err(PreferenceError::EmptySelection);
        }
        let settings = self
            .settings_rx
            .borrow()
            .clone()
            .ok_or(PreferenceError::SettingsNotLoaded)?;

        let updated = settings.with_preference(scope, self.draft.clone());
        info!(
            %scope,
            field = scope.settings_field(),
            draft = %self.draft,
            "Saving language preferences"
        );

        let store = Arc::clone(&self.store);
        let (tx, rx) = oneshot::channel();
        self.runtime.spawn(async move {
            let result = store
                .patch(updated)
                .await
                .map_err(|e| PreferenceError::SaveFailed {
                    reason: format!("{:#}", e),
                });
            // Receiver is gone only if the editor was dropped
            let _ = tx.send(result);
        });

        self.last_error = None;
        self.pending = Some(PendingSave {
            session: self.session,
            rx,
        });
        Ok(())
    }

    /// Abandons the draft and closes without touching the store
    pub fn discard(&mut self) {
        let Some(scope) = self.scope else {
            debug!("Discard requested while editor is closed");
            return;
        };
        info!(%scope, "Discarding language preference draft");
        self.scope = None;
        self.last_error = None;
        (self.on_close)();
    }

    /// Non-blocking; call once per frame.
    ///
    /// Finishes a completed save and re-runs the reset when the stored list
    /// for the open scope changed.
    pub fn poll(&mut self) -> Option<SaveResult> {
        let completed = self.try_complete_save();

        if self.scope.is_some() && self.settings_rx.has_changed().unwrap_or(false) {
            self.sync_with_store();
        }

        completed
    }

    /// Waits for the in-flight save, if any, and applies its outcome
    pub async fn settle(&mut self) -> Option<SaveResult> {
        let PendingSave { session, rx } = self.pending.take()?;
        let result = rx.await.unwrap_or_else(|_| Err(save_task_lost()));
        self.finish_save(session, result.clone());
        if self.scope.is_some() && self.settings_rx.has_changed().unwrap_or(false) {
            self.sync_with_store();
        }
        Some(result)
    }

    fn try_complete_save(&mut self) -> Option<SaveResult> {
        let pending = self.pending.as_mut()?;
        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(save_task_lost()),
        };
        let session = pending.session;
        self.pending = None;
        self.finish_save(session, result.clone());
        Some(result)
    }

    fn finish_save(&mut self, session: u64, result: SaveResult) {
        let same_dialog = self.scope.is_some() && self.session == session;

        match result {
            Ok(()) => {
                info!("Language preferences saved");
                if same_dialog {
                    self.scope = None;
                    (self.on_close)();
                } else {
                    debug!("Save finished after its dialog was closed");
                }
            }
            Err(e) => {
                warn!("{}", e);
                if same_dialog {
                    self.last_error = Some(e);
                }
            }
        }
    }

    /// Reset algorithm: copy the stored list into the draft when it differs
    /// from what the draft was last copied from.
    fn sync_with_store(&mut self) {
        let Some(scope) = self.scope else {
            return;
        };

        let latest = match self.settings_rx.borrow_and_update().as_ref() {
            Some(settings) => settings.preference(scope).clone(),
            None => {
                debug!(%scope, "Settings not loaded yet, draft stays empty");
                return;
            }
        };

        if self.source.as_ref() != Some(&latest) {
            debug!(%scope, list = %latest, "Draft reset from store");
            self.draft = latest.clone();
            self.source = Some(latest);
        }
    }
}

fn save_task_lost() -> PreferenceError {
    PreferenceError::SaveFailed {
        reason: "save task ended without reporting a result".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemorySettingsStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Harness {
        store: Arc<InMemorySettingsStore>,
        editor: LanguagePreferenceEditor,
        closes: Arc<AtomicUsize>,
    }

    fn settings(series: &[&str], episode: &[&str]) -> Settings {
        serde_json::from_value(json!({
            "LanguagePreference": series,
            "EpisodeLanguagePreference": episode,
            "AutoGroupSeries": true
        }))
        .expect("valid settings")
    }

    fn harness(store: InMemorySettingsStore) -> Harness {
        let store = Arc::new(store);
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let editor = LanguagePreferenceEditor::new(
            store.clone() as Arc<dyn SettingsStore>,
            Handle::current(),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        Harness {
            store,
            editor,
            closes,
        }
    }

    fn codes(list: &PreferenceList) -> Vec<&str> {
        list.iter().map(|c| c.as_str()).collect()
    }

    #[tokio::test]
    async fn test_open_copies_store_list_for_each_scope() {
        let mut h = harness(InMemorySettingsStore::new(settings(
            &["x-jat", "en"],
            &["en", "ja"],
        )));

        h.editor.open(PreferenceScope::Series);
        assert_eq!(codes(h.editor.draft()), vec!["x-jat", "en"]);

        h.editor.close();
        h.editor.open(PreferenceScope::Episode);
        assert_eq!(codes(h.editor.draft()), vec!["en", "ja"]);
    }

    #[tokio::test]
    async fn test_closed_editor_has_no_active_list() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &["ja"])));
        assert!(h.editor.active_preference_list().is_none());
        assert!(!h.editor.toggle(&"fr".into(), true));

        h.editor.open(PreferenceScope::Episode);
        let expected: PreferenceList = ["ja"].into_iter().collect();
        assert_eq!(h.editor.active_preference_list(), Some(expected));
    }

    #[tokio::test]
    async fn test_check_then_save_series() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &["ja"])));
        h.editor.open(PreferenceScope::Series);

        assert!(h.editor.toggle(&"fr".into(), true));
        assert_eq!(codes(h.editor.draft()), vec!["en", "fr"]);

        h.editor.save().expect("save issued");
        assert!(h.editor.is_saving());
        assert_eq!(h.editor.settle().await, Some(Ok(())));

        let stored = h.store.snapshot().expect("loaded");
        assert_eq!(stored, settings(&["en", "fr"], &["ja"]));
        assert_eq!(h.store.patch_count(), 1);
        assert_eq!(h.closes.load(Ordering::SeqCst), 1);
        assert!(!h.editor.is_open());
    }

    #[tokio::test]
    async fn test_uncheck_then_save_episode() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &["en", "ja"])));
        h.editor.open(PreferenceScope::Episode);

        assert!(h.editor.toggle(&"ja".into(), false));
        assert_eq!(codes(h.editor.draft()), vec!["en"]);

        h.editor.save().expect("save issued");
        h.editor.settle().await;

        let stored = h.store.snapshot().expect("loaded");
        assert_eq!(codes(stored.preference(PreferenceScope::Episode)), vec!["en"]);
        assert_eq!(codes(stored.preference(PreferenceScope::Series)), vec!["en"]);
    }

    #[tokio::test]
    async fn test_empty_draft_cannot_be_saved() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.open(PreferenceScope::Series);
        h.editor.toggle(&"en".into(), false);

        assert!(h.editor.draft().is_empty());
        assert!(!h.editor.can_save());
        assert_eq!(h.editor.save(), Err(PreferenceError::EmptySelection));
        assert!(h.editor.settle().await.is_none());
        assert_eq!(h.store.patch_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_is_idempotent_and_removes_duplicates() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en", "ja", "en"], &[])));
        h.editor.open(PreferenceScope::Series);
        assert_eq!(codes(h.editor.draft()), vec!["en", "ja", "en"]);

        assert!(!h.editor.toggle(&"ja".into(), true));
        assert!(h.editor.toggle(&"en".into(), false));
        assert_eq!(codes(h.editor.draft()), vec!["ja"]);
        assert!(!h.editor.toggle(&"en".into(), false));
    }

    #[tokio::test]
    async fn test_discard_never_patches() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.open(PreferenceScope::Series);
        h.editor.toggle(&"de".into(), true);

        h.editor.discard();

        assert!(!h.editor.is_open());
        assert_eq!(h.closes.load(Ordering::SeqCst), 1);
        assert_eq!(h.store.patch_count(), 0);
        assert_eq!(h.store.snapshot(), Some(settings(&["en"], &[])));
    }

    #[tokio::test]
    async fn test_discard_while_closed_does_not_notify() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.discard();
        assert_eq!(h.closes.load(Ordering::SeqCst), 0);

        h.editor.open(PreferenceScope::Series);
        h.editor.discard();
        h.editor.discard();
        assert_eq!(h.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scope_switch_does_not_leak_draft() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &["ja"])));

        h.editor.open(PreferenceScope::Series);
        h.editor.toggle(&"fr".into(), true);
        h.editor.close();
        assert_eq!(codes(h.editor.draft()), vec!["en", "fr"]);

        h.editor.open(PreferenceScope::Episode);
        assert_eq!(codes(h.editor.draft()), vec!["ja"]);

        h.editor.close();
        h.editor.open(PreferenceScope::Series);
        assert_eq!(codes(h.editor.draft()), vec!["en"]);
        assert_eq!(h.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_dialog_and_draft() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.store.fail_next("settings server returned 500");
        h.editor.open(PreferenceScope::Series);
        h.editor.toggle(&"ja".into(), true);

        h.editor.save().expect("save issued");
        let result = h.editor.settle().await.expect("save was pending");
        assert!(matches!(result, Err(PreferenceError::SaveFailed { .. })));

        assert!(h.editor.is_open());
        assert_eq!(codes(h.editor.draft()), vec!["en", "ja"]);
        assert!(h.editor.last_error().is_some());
        assert_eq!(h.closes.load(Ordering::SeqCst), 0);

        // Retry succeeds
        h.editor.save().expect("retry issued");
        assert_eq!(h.editor.settle().await, Some(Ok(())));
        assert!(h.editor.last_error().is_none());
        assert_eq!(h.closes.load(Ordering::SeqCst), 1);
        assert_eq!(h.store.patch_count(), 2);
    }

    #[tokio::test]
    async fn test_second_save_refused_while_pending() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.open(PreferenceScope::Series);

        h.editor.save().expect("save issued");
        assert!(!h.editor.can_save());
        assert_eq!(h.editor.save(), Err(PreferenceError::SaveInFlight));

        h.editor.settle().await;
        assert_eq!(h.store.patch_count(), 1);
    }

    #[tokio::test]
    async fn test_toggle_refused_while_pending() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.open(PreferenceScope::Series);

        h.editor.save().expect("save issued");
        assert!(!h.editor.toggle(&"de".into(), true));
        assert!(!h.editor.toggle(&"en".into(), false));
        assert_eq!(codes(h.editor.draft()), vec!["en"]);

        assert_eq!(h.editor.settle().await, Some(Ok(())));
        let stored = h.store.snapshot().expect("loaded");
        assert_eq!(codes(stored.preference(PreferenceScope::Series)), vec!["en"]);
    }

    #[tokio::test]
    async fn test_toggle_accepted_again_after_failed_save() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.store.fail_next("disk full");
        h.editor.open(PreferenceScope::Series);

        h.editor.save().expect("save issued");
        h.editor.settle().await;

        assert!(h.editor.toggle(&"de".into(), true));
        assert_eq!(codes(h.editor.draft()), vec!["en", "de"]);
    }

    #[tokio::test]
    async fn test_save_outlives_closed_dialog() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &["ja"])));
        h.editor.open(PreferenceScope::Series);
        h.editor.toggle(&"fr".into(), true);
        h.editor.save().expect("save issued");

        h.editor.close();
        h.editor.open(PreferenceScope::Episode);
        assert_eq!(h.editor.settle().await, Some(Ok(())));

        // The write landed but the newer dialog stays open
        assert_eq!(
            codes(h.store.snapshot().expect("loaded").preference(PreferenceScope::Series)),
            vec!["en", "fr"]
        );
        assert_eq!(h.editor.scope(), Some(PreferenceScope::Episode));
        assert_eq!(h.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_draft_waits_for_settings_to_load() {
        let mut h = harness(InMemorySettingsStore::unloaded());
        h.editor.open(PreferenceScope::Episode);

        assert!(h.editor.draft().is_empty());
        assert!(!h.editor.settings_loaded());
        h.editor.toggle(&"en".into(), true);
        assert_eq!(h.editor.save(), Err(PreferenceError::SettingsNotLoaded));

        h.store.set(settings(&["en"], &["ja", "en"]));
        h.editor.poll();
        assert_eq!(codes(h.editor.draft()), vec!["ja", "en"]);
    }

    #[tokio::test]
    async fn test_store_change_while_open_resets_draft() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.open(PreferenceScope::Series);
        h.editor.toggle(&"fr".into(), true);

        // Change to the other scope's list leaves the draft alone
        h.store.set(settings(&["en"], &["ko"]));
        h.editor.poll();
        assert_eq!(codes(h.editor.draft()), vec!["en", "fr"]);

        h.store.set(settings(&["de"], &["ko"]));
        h.editor.poll();
        assert_eq!(codes(h.editor.draft()), vec!["de"]);
    }

    #[tokio::test]
    async fn test_poll_completes_save() {
        let mut h = harness(InMemorySettingsStore::new(settings(&["en"], &[])));
        h.editor.open(PreferenceScope::Series);
        h.editor.save().expect("save issued");

        let mut outcome = None;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            outcome = h.editor.poll();
            if outcome.is_some() {
                break;
            }
        }

        assert_eq!(outcome, Some(Ok(())));
        assert_eq!(h.closes.load(Ordering::SeqCst), 1);
    }
}

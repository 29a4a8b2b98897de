use crate::application::LanguagePreferenceEditor;
use crate::domain::language::LanguageCatalog;
use crate::domain::ports::SettingsStore;
use crate::domain::preferences::PreferenceScope;
use crate::infrastructure::i18n::I18nService;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::languages_modal::render_languages_modal;
use crate::interfaces::settings_components::{
    render_language_settings, render_preference_summary,
};
use crossbeam_channel::Receiver;
use eframe::egui;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

const MAX_LOG_LINES: usize = 200;

/// Settings window hosting the languages dialog
pub struct PreferencesApp {
    store: Arc<dyn SettingsStore>,
    editor: LanguagePreferenceEditor,
    catalog: LanguageCatalog,
    i18n: I18nService,
    log_rx: Receiver<String>,
    logs: VecDeque<String>,
}

impl PreferencesApp {
    pub fn new(
        ctx: &egui::Context,
        store: Arc<dyn SettingsStore>,
        runtime: tokio::runtime::Handle,
        catalog: LanguageCatalog,
        i18n: I18nService,
        log_rx: Receiver<String>,
    ) -> Self {
        let repaint_ctx = ctx.clone();
        let editor = LanguagePreferenceEditor::new(Arc::clone(&store), runtime, move || {
            repaint_ctx.request_repaint();
        });

        Self {
            store,
            editor,
            catalog,
            i18n,
            log_rx,
            logs: VecDeque::new(),
        }
    }

    fn drain_logs(&mut self) {
        while let Ok(line) = self.log_rx.try_recv() {
            if self.logs.len() == MAX_LOG_LINES {
                self.logs.pop_front();
            }
            self.logs.push_back(line.trim_end().to_string());
        }
    }
}

impl eframe::App for PreferencesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());

        // --- 1. Background events (logs, settings changes, save results) ---
        self.drain_logs();
        self.editor.poll();
        if self.editor.is_saving() || !self.editor.settings_loaded() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        // --- 2. Log footer ---
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(140.0)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(self.i18n.t("logs"))
                        .size(12.0)
                        .color(DesignSystem::TEXT_SECONDARY),
                );
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.logs {
                            ui.label(
                                egui::RichText::new(line)
                                    .monospace()
                                    .size(11.0)
                                    .color(DesignSystem::TEXT_MUTED),
                            );
                        }
                    });
            });

        // --- 3. Preferences overview ---
        let mut requested_scope = None;
        egui::CentralPanel::default()
            .frame(DesignSystem::main_frame())
            .show(ctx, |ui| {
                ui.heading(self.i18n.t("app_title"));
                ui.add_space(DesignSystem::SPACING_SMALL);
                render_language_settings(ui, &mut self.i18n);
                ui.add_space(DesignSystem::SPACING_MEDIUM);

                ui.label(
                    egui::RichText::new(self.i18n.t("current_preferences"))
                        .color(DesignSystem::TEXT_SECONDARY),
                );
                ui.add_space(DesignSystem::SPACING_SMALL);

                let settings = self.store.snapshot();
                for scope in PreferenceScope::ALL {
                    if render_preference_summary(
                        ui,
                        scope,
                        settings.as_ref(),
                        &self.catalog,
                        &self.i18n,
                    ) {
                        requested_scope = Some(scope);
                    }
                    ui.add_space(DesignSystem::SPACING_SMALL);
                }
            });

        // The modal blocks the overview; an open draft is never replaced from here
        if let Some(scope) = requested_scope
            && !self.editor.is_open()
        {
            self.editor.open(scope);
        }

        // --- 4. Languages dialog ---
        render_languages_modal(ctx, &mut self.editor, &self.catalog, &self.i18n);
    }
}

//! Languages dialog: one checkbox per catalog entry plus Discard / Save.

use crate::application::LanguagePreferenceEditor;
use crate::domain::language::{LanguageCatalog, LanguageCode};
use crate::domain::preferences::PreferenceScope;
use crate::infrastructure::i18n::I18nService;
use crate::interfaces::components::card::Card;
use crate::interfaces::components::modal_panel::ModalPanel;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Widgets drawn for one frame of the dialog
pub struct LanguagesModalOutput {
    /// One checkbox per catalog entry, in catalog order
    pub checkboxes: Vec<(LanguageCode, egui::Response)>,
    pub save: egui::Response,
    pub discard: egui::Response,
    pub close: egui::Response,
}

pub fn scope_label_key(scope: PreferenceScope) -> &'static str {
    match scope {
        PreferenceScope::Series => "series_scope",
        PreferenceScope::Episode => "episode_scope",
    }
}

/// Renders the dialog while the editor is open. Hidden editors render nothing.
///
/// The close button and Escape act as Discard.
pub fn render_languages_modal(
    ctx: &egui::Context,
    editor: &mut LanguagePreferenceEditor,
    catalog: &LanguageCatalog,
    i18n: &I18nService,
) -> Option<LanguagesModalOutput> {
    let scope = editor.scope()?;

    let header = i18n.tf("languages_header", &[("scope", i18n.t(scope_label_key(scope)))]);

    let response = ModalPanel::new("languages_modal", header)
        .show_if(editor.is_open())
        .show(ctx, |ui| {
            let checkboxes = Card::new()
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("language_list")
                        .max_height(DesignSystem::LANGUAGE_LIST_HEIGHT)
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            ui.add_enabled_ui(!editor.is_saving(), |ui| {
                                render_language_list(ui, editor, catalog)
                            })
                            .inner
                        })
                        .inner
                })
                .inner;

            ui.add_space(DesignSystem::SPACING_SMALL);
            render_status_line(ui, editor, i18n);
            ui.add_space(DesignSystem::SPACING_SMALL);

            let (save, discard) = ui
                .with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let save_btn = egui::Button::new(
                        egui::RichText::new(i18n.t("save"))
                            .strong()
                            .color(DesignSystem::TEXT_PRIMARY),
                    )
                    .fill(DesignSystem::ACCENT_PRIMARY)
                    .min_size(egui::vec2(90.0, 32.0));
                    let save = ui.add_enabled(editor.can_save(), save_btn);

                    let discard_btn = egui::Button::new(
                        egui::RichText::new(i18n.t("discard")).color(DesignSystem::TEXT_SECONDARY),
                    )
                    .fill(DesignSystem::BG_INPUT)
                    .min_size(egui::vec2(90.0, 32.0));
                    let discard = ui.add(discard_btn);

                    (save, discard)
                })
                .inner;

            (checkboxes, save, discard)
        });

    let (checkboxes, save, discard) = response.inner?;
    let close = response.close_button?;

    if save.clicked() {
        if let Err(e) = editor.save() {
            tracing::warn!("Save refused: {}", e);
        }
    } else if discard.clicked() || response.close_requested {
        editor.discard();
    }

    Some(LanguagesModalOutput {
        checkboxes,
        save,
        discard,
        close,
    })
}

fn render_language_list(
    ui: &mut egui::Ui,
    editor: &mut LanguagePreferenceEditor,
    catalog: &LanguageCatalog,
) -> Vec<(LanguageCode, egui::Response)> {
    catalog
        .iter()
        .map(|entry| {
            let mut checked = editor.is_checked(&entry.code);
            let response = ui.checkbox(&mut checked, entry.label.as_str());
            if response.changed() {
                editor.toggle(&entry.code, checked);
            }
            (entry.code.clone(), response)
        })
        .collect()
}

fn render_status_line(ui: &mut egui::Ui, editor: &LanguagePreferenceEditor, i18n: &I18nService) {
    ui.horizontal(|ui| {
        if !editor.settings_loaded() {
            ui.spinner();
            ui.label(
                egui::RichText::new(i18n.t("settings_loading")).color(DesignSystem::TEXT_MUTED),
            );
        } else if editor.is_saving() {
            ui.spinner();
            ui.label(egui::RichText::new(i18n.t("saving")).color(DesignSystem::TEXT_SECONDARY));
        } else if let Some(error) = editor.last_error() {
            ui.label(
                egui::RichText::new(
                    i18n.tf("save_failed", &[("reason", error.to_string().as_str())]),
                )
                .color(DesignSystem::DANGER),
            );
        } else if editor.draft().is_empty() {
            ui.label(
                egui::RichText::new(i18n.t("select_at_least_one"))
                    .color(DesignSystem::WARNING)
                    .italics(),
            );
        }
    });
}

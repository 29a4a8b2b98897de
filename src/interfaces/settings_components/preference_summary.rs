//! Read-only summary of one stored preference list with its edit button

use crate::domain::language::LanguageCatalog;
use crate::domain::preferences::PreferenceScope;
use crate::domain::settings::Settings;
use crate::infrastructure::i18n::I18nService;
use crate::interfaces::components::card::Card;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::languages_modal::scope_label_key;
use eframe::egui;

/// Catalog labels for `scope`, in preference order. Unknown codes are shown raw.
pub fn preference_labels(
    settings: &Settings,
    scope: PreferenceScope,
    catalog: &LanguageCatalog,
) -> Vec<String> {
    settings
        .preference(scope)
        .iter()
        .map(|code| {
            catalog
                .label(code)
                .map(str::to_string)
                .unwrap_or_else(|| code.to_string())
        })
        .collect()
}

/// Returns true when the edit button was clicked
pub fn render_preference_summary(
    ui: &mut egui::Ui,
    scope: PreferenceScope,
    settings: Option<&Settings>,
    catalog: &LanguageCatalog,
    i18n: &I18nService,
) -> bool {
    Card::new()
        .title(i18n.t(scope_label_key(scope)))
        .show(ui, |ui| {
            match settings {
                Some(settings) => {
                    let labels = preference_labels(settings, scope, catalog);
                    let text = if labels.is_empty() {
                        i18n.t("none_selected").to_string()
                    } else {
                        labels.join(", ")
                    };
                    ui.label(egui::RichText::new(text).color(DesignSystem::TEXT_PRIMARY));
                }
                None => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(
                            egui::RichText::new(i18n.t("settings_loading"))
                                .color(DesignSystem::TEXT_MUTED),
                        );
                    });
                }
            }

            ui.add_space(DesignSystem::SPACING_SMALL);

            let key = match scope {
                PreferenceScope::Series => "edit_series_languages",
                PreferenceScope::Episode => "edit_episode_languages",
            };
            ui.button(i18n.t(key)).clicked()
        })
        .inner
}

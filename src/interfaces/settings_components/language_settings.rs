//! Interface language picker

use crate::infrastructure::i18n::I18nService;
use eframe::egui;

/// Renders one selectable label per translation file
pub fn render_language_settings(ui: &mut egui::Ui, i18n: &mut I18nService) {
    ui.horizontal(|ui| {
        ui.label(i18n.t("ui_language"));

        let current_code = i18n.current_language_code().to_string();
        let languages = i18n.available_languages().to_vec();

        for lang in languages {
            if ui
                .selectable_label(current_code == lang.code, lang.native_name.as_str())
                .clicked()
                && i18n.set_language(&lang.code)
            {
                tracing::info!("Interface language set to {}", lang.code);
            }
        }
    });
}

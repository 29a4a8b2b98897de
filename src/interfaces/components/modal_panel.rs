//! Generic modal chrome: backdrop, centered frame, header and close request.
//!
//! Built on `egui::Modal`, so nothing behind the panel receives input while
//! it is shown. A click on the backdrop is swallowed and is not a close request.

use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

pub struct ModalPanel {
    id: egui::Id,
    show: bool,
    header: String,
}

pub struct ModalResponse<R> {
    /// Result of the content closure, `None` when the panel is hidden
    pub inner: Option<R>,
    /// Header close button, `None` when the panel is hidden
    pub close_button: Option<egui::Response>,
    /// Close button or Escape; hosts treat it as Discard
    pub close_requested: bool,
}

impl ModalPanel {
    pub fn new(id_salt: impl std::hash::Hash, header: impl Into<String>) -> Self {
        Self {
            id: egui::Id::new(id_salt),
            show: true,
            header: header.into(),
        }
    }

    pub fn show_if(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn show<R>(
        self,
        ctx: &egui::Context,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> ModalResponse<R> {
        if !self.show {
            return ModalResponse {
                inner: None,
                close_button: None,
                close_requested: false,
            };
        }

        let header = self.header;
        let response = egui::Modal::new(self.id)
            .backdrop_color(DesignSystem::BG_OVERLAY)
            .frame(DesignSystem::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(DesignSystem::MODAL_WIDTH);
                let close_button = ui
                    .horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(&header)
                                .size(18.0)
                                .strong()
                                .color(DesignSystem::TEXT_PRIMARY),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.add(egui::Button::new("✕").frame(false))
                        })
                        .inner
                    })
                    .inner;
                ui.add_space(DesignSystem::SPACING_SMALL);

                (add_contents(ui), close_button)
            });

        // Escape only closes the topmost panel
        let escape = response.is_top_modal
            && !response.any_popup_open
            && ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Escape));

        let (inner, close_button) = response.inner;
        let close_requested = close_button.clicked() || escape;

        ModalResponse {
            inner: Some(inner),
            close_button: Some(close_button),
            close_requested,
        }
    }
}

pub mod card;
pub mod modal_panel;

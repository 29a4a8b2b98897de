pub mod components;
pub mod design_system;
pub mod languages_modal;
pub mod settings_components;
pub mod ui;

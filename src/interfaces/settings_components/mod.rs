//! Settings components module

pub mod language_settings;
pub mod preference_summary;

pub use language_settings::render_language_settings;
pub use preference_summary::render_preference_summary;

// Draft state behind the languages dialog
pub mod language_editor;

pub use language_editor::LanguagePreferenceEditor;

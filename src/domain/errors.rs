use thiserror::Error;

/// Errors raised by the language preference editor
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Saving language preferences failed: {reason}")]
    SaveFailed { reason: String },

    #[error("At least one language must be selected")]
    EmptySelection,

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Language editor is not open")]
    NotOpen,

    #[error("Settings have not been loaded yet")]
    SettingsNotLoaded,
}

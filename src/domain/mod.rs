// Language catalog
pub mod language;

// Preference scopes and lists
pub mod preferences;

// Settings object
pub mod settings;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;

pub mod catalog_loader;
pub mod i18n;
pub mod in_memory;
pub mod settings_persistence;

pub use in_memory::InMemorySettingsStore;
pub use settings_persistence::FileSettingsStore;

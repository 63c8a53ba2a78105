mod settings_store;

pub use settings_store::SettingsStore;

mod env_settings_store;
mod in_memory_settings_store;

pub use env_settings_store::EnvSettingsStore;
pub use in_memory_settings_store::InMemorySettingsStore;

pub mod settings;
pub mod storage;

// Re-export all port traits for convenience
pub use settings::SettingsStore;
pub use storage::{ProviderCapabilities, StorageProvider};

mod storage_provider;

pub use storage_provider::{ProviderCapabilities, StorageProvider};

// Infrastructure error types
pub mod error;

// Provider-specific implementations
pub mod bunny;

// Re-export key types
pub use bunny::{BunnyClient, BunnyStorageProvider, StorageEndpoints, CONNECTION_TEST_KEY};
pub use error::{BunnyError, BunnyResult};

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

// Re-export key types for convenience

// Domain types - core entities, value objects and errors
pub use domain::{
    AclUpdate, BulkFailure, CopyItem, DeleteItem, DomainValidationError, KeyLocation, ObjectKey,
    ProviderSettings, Region, StorageError, StorageObjectEntry, StorageResult, UploadRequest,
    UploadSource, WriteProbe,
};

// Port types - interfaces for external systems
pub use ports::{ProviderCapabilities, SettingsStore, StorageProvider};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, AppBuilder, AppConfig, AppDependencies, AppError,
    AppServices, SettingsBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    settings::{EnvSettingsStore, InMemorySettingsStore},
    storage::{BunnyClient, BunnyError, BunnyStorageProvider, StorageEndpoints},
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, AppBuilder, AppServices, BunnyClient, BunnyStorageProvider,
        InMemorySettingsStore, ObjectKey, ProviderSettings, SettingsStore, StorageEndpoints,
        StorageProvider, UploadRequest, UploadSource,
    };
}

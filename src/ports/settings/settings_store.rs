use crate::domain::models::ProviderSettings;

/// Port for the host's settings store.
///
/// Implementations must return the current values on every call; callers
/// never cache the snapshot beyond a single operation.
pub trait SettingsStore: Send + Sync + 'static {
    fn load(&self) -> ProviderSettings;
}

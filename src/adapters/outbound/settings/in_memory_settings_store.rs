use std::sync::{Arc, RwLock};

use crate::{domain::models::ProviderSettings, ports::settings::SettingsStore};

/// In-memory settings store for tests, the CLI and hosts that push settings in.
///
/// Clones share the same underlying settings, so an update made through one
/// handle is seen by the next operation of every provider holding another.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    settings: Arc<RwLock<ProviderSettings>>,
}

impl InMemorySettingsStore {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Replace all settings
    pub fn replace(&self, settings: ProviderSettings) {
        self.update(|current| *current = settings);
    }

    /// Modify settings in place
    pub fn update(&self, f: impl FnOnce(&mut ProviderSettings)) {
        let mut guard = match self.settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self) -> ProviderSettings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

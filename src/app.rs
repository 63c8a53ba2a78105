use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::Router;
use uuid::Uuid;

use crate::{
    adapters::{
        inbound::http::router::{create_router, AppState},
        outbound::{
            settings::{EnvSettingsStore, InMemorySettingsStore},
            storage::{BunnyClient, BunnyStorageProvider, StorageEndpoints},
        },
    },
    domain::models::ProviderSettings,
    ports::settings::SettingsStore,
};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoints: StorageEndpoints,
    pub request_timeout: Duration,
    /// Directory for temporary upload buffers
    pub temp_dir: PathBuf,
    pub settings_backend: SettingsBackend,
    /// Shared secret for the action endpoint; generated when absent
    pub action_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: StorageEndpoints::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            temp_dir: std::env::temp_dir(),
            settings_backend: SettingsBackend::Environment,
            action_token: None,
        }
    }
}

/// Where provider settings are read from
#[derive(Debug, Clone)]
pub enum SettingsBackend {
    /// `BUNNY_*` environment variables, re-read on every operation
    Environment,
    /// A shared in-memory store; keep a clone to change settings at runtime
    InMemory(InMemorySettingsStore),
}

/// Application dependencies container
pub struct AppDependencies {
    pub client: BunnyClient,
    pub settings: Arc<dyn SettingsStore>,
}

/// Application services container
#[derive(Clone)]
pub struct AppServices {
    pub provider: Arc<BunnyStorageProvider>,
    pub action_token: String,
}

impl AppServices {
    pub fn app_state(&self) -> AppState {
        AppState {
            provider: self.provider.clone(),
            action_token: self.action_token.clone(),
        }
    }

    /// Router serving the action endpoint
    pub fn router(&self) -> Router {
        create_router(self.app_state())
    }
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_endpoints(mut self, endpoints: StorageEndpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = temp_dir.into();
        self
    }

    pub fn with_settings_backend(mut self, backend: SettingsBackend) -> Self {
        self.config.settings_backend = backend;
        self
    }

    pub fn with_action_token(mut self, token: impl Into<String>) -> Self {
        self.config.action_token = Some(token.into());
        self
    }

    /// Build the application dependencies
    pub fn build_dependencies(&self) -> Result<AppDependencies, AppError> {
        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout)
            .build()
            .map_err(|e| AppError::ClientInit {
                message: e.to_string(),
            })?;

        let client = BunnyClient::with_http_client(http, self.config.endpoints.clone());

        let settings: Arc<dyn SettingsStore> = match &self.config.settings_backend {
            SettingsBackend::Environment => Arc::new(EnvSettingsStore::new()),
            SettingsBackend::InMemory(store) => Arc::new(store.clone()),
        };

        Ok(AppDependencies { client, settings })
    }

    /// Build the complete application with services
    pub fn build(self) -> Result<AppServices, AppError> {
        if !self.config.temp_dir.is_dir() {
            return Err(AppError::Configuration {
                message: format!(
                    "Temporary directory does not exist: {}",
                    self.config.temp_dir.display()
                ),
            });
        }

        if matches!(&self.config.action_token, Some(token) if token.is_empty()) {
            return Err(AppError::Configuration {
                message: "Action token must not be empty".to_string(),
            });
        }

        let deps = self.build_dependencies()?;

        let provider = Arc::new(BunnyStorageProvider::with_temp_dir(
            deps.client,
            deps.settings,
            self.config.temp_dir,
        ));

        let action_token = self
            .config
            .action_token
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        Ok(AppServices {
            provider,
            action_token,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("HTTP client initialization error: {message}")]
    ClientInit { message: String },
}

/// Create an application with fixed in-memory settings
pub fn create_in_memory_app(settings: ProviderSettings) -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_settings_backend(SettingsBackend::InMemory(InMemorySettingsStore::new(
            settings,
        )))
        .build()
}

/// Create application from environment variables.
///
/// Endpoint overrides: `BUNNY_STORAGE_SCHEME`, `BUNNY_STORAGE_HOST`,
/// `BUNNY_API_BASE`. Also reads `BUNNY_TIMEOUT_SECS`, `BUNNY_TEMP_DIR` and
/// `BUNNY_ACTION_TOKEN`. Provider settings come from [`EnvSettingsStore`].
pub fn create_app_from_env() -> Result<AppServices, AppError> {
    let mut endpoints = StorageEndpoints::default();
    if let Some(scheme) = env_var("BUNNY_STORAGE_SCHEME") {
        endpoints.scheme = scheme;
    }
    if let Some(host) = env_var("BUNNY_STORAGE_HOST") {
        endpoints.storage_host = host;
    }
    if let Some(api_base) = env_var("BUNNY_API_BASE") {
        endpoints.api_base = api_base;
    }

    let mut builder = AppBuilder::new()
        .with_endpoints(endpoints)
        .with_settings_backend(SettingsBackend::Environment);

    if let Some(timeout) = env_var("BUNNY_TIMEOUT_SECS") {
        let secs = timeout.parse::<u64>().map_err(|_| AppError::Configuration {
            message: format!("BUNNY_TIMEOUT_SECS is not a number: {}", timeout),
        })?;
        builder = builder.with_request_timeout(Duration::from_secs(secs));
    }

    if let Some(temp_dir) = env_var("BUNNY_TEMP_DIR") {
        builder = builder.with_temp_dir(temp_dir);
    }

    if let Some(token) = env_var("BUNNY_ACTION_TOKEN") {
        builder = builder.with_action_token(token);
    }

    builder.build()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

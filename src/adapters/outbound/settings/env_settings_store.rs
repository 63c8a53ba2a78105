use std::env;

use crate::{domain::models::ProviderSettings, ports::settings::SettingsStore};

pub const STORAGE_ZONE_VAR: &str = "BUNNY_STORAGE_ZONE";
pub const API_KEY_VAR: &str = "BUNNY_API_KEY";
pub const REGION_VAR: &str = "BUNNY_REGION";
pub const CDN_URL_VAR: &str = "BUNNY_CDN_URL";
pub const CUSTOM_CNAME_VAR: &str = "BUNNY_CUSTOM_CNAME";
pub const ENABLE_DELIVERY_DOMAIN_VAR: &str = "BUNNY_ENABLE_DELIVERY_DOMAIN";
pub const DELIVERY_DOMAIN_VAR: &str = "BUNNY_DELIVERY_DOMAIN";

/// Settings store backed by `BUNNY_*` environment variables.
///
/// Variables are read on every `load`, so changes to the process environment
/// take effect on the next operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettingsStore;

impl EnvSettingsStore {
    pub fn new() -> Self {
        Self
    }
}

impl SettingsStore for EnvSettingsStore {
    fn load(&self) -> ProviderSettings {
        ProviderSettings {
            storage_zone: var(STORAGE_ZONE_VAR),
            api_key: var(API_KEY_VAR),
            region: var(REGION_VAR),
            cdn_url: var(CDN_URL_VAR),
            custom_cname: var(CUSTOM_CNAME_VAR),
            delivery_domain_enabled: parse_flag(&var(ENABLE_DELIVERY_DOMAIN_VAR)),
            delivery_domain: var(DELIVERY_DOMAIN_VAR),
        }
    }
}

fn var(name: &str) -> String {
    env::var(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

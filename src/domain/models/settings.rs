use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Region;

/// Snapshot of the provider settings held by the host.
///
/// A fresh snapshot is taken for every operation; nothing derived from it is
/// cached between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub storage_zone: String,
    pub api_key: String,
    pub region: String,
    pub cdn_url: String,
    pub custom_cname: String,
    pub delivery_domain_enabled: bool,
    pub delivery_domain: String,
}

impl ProviderSettings {
    /// Resolve the public delivery domain.
    ///
    /// CDN URL, then custom CNAME, then the generic delivery domain when it
    /// is enabled. `None` means objects are served from the raw storage host.
    pub fn delivery_domain(&self) -> Option<&str> {
        if !self.cdn_url.is_empty() {
            return Some(&self.cdn_url);
        }

        if !self.custom_cname.is_empty() {
            return Some(&self.custom_cname);
        }

        if self.delivery_domain_enabled && !self.delivery_domain.is_empty() {
            return Some(&self.delivery_domain);
        }

        None
    }

    /// Configured region, sanitized
    pub fn region(&self) -> Region {
        Region::sanitize(&self.region)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::{debug, info, instrument, warn};

use super::{
    client::{BunnyClient, StorageResponse, STORAGE_ZONE_REGION_HEADER},
    temp_buffer::TempUploadBuffer,
};
use crate::{
    adapters::outbound::storage::error::BunnyResult,
    domain::{
        errors::{StorageError, StorageResult, ValidationError},
        models::{
            AclUpdate, BulkFailure, CopyItem, DeleteItem, KeyLocation, ProviderSettings,
            StorageObjectEntry, UploadRequest, UploadSource, WriteProbe,
        },
        value_objects::{normalize_key, Region},
    },
    ports::{
        settings::SettingsStore,
        storage::{ProviderCapabilities, StorageProvider},
    },
};

pub const PROVIDER_NAME: &str = "Bunny.net";
pub const PROVIDER_KEY: &str = "bunny";
pub const SERVICE_NAME: &str = "Storage";
pub const SERVICE_KEY: &str = "storage";
pub const PROVIDER_SERVICE_NAME: &str = "Bunny.net Storage";
pub const DEFAULT_DOMAIN: &str = "bunnycdn.com";
pub const CONSOLE_URL: &str = "https://dash.bunny.net/storage/";
pub const STREAM_WRAPPER_PROTOCOL: &str = "bunnystorage";

pub const PUBLIC_ACL: &str = "public";
pub const PRIVATE_ACL: &str = "private";

/// Key written (and removed again) by the connection test
pub const CONNECTION_TEST_KEY: &str = ".bunny-connection-test";

const CAPABILITIES: ProviderCapabilities = ProviderCapabilities {
    bucket_creation: false,
    bucket_listing: false,
    object_acls: false,
    block_public_access: false,
    object_ownership: false,
    region_required: false,
    regions: &[],
    stream_wrapper: false,
    requires_secret_key: false,
};

const CREATE_BUCKET_UNSUPPORTED: &str =
    "Buckets (Storage Zones) must be created from the Bunny.net dashboard.";
const LIST_BUCKETS_UNSUPPORTED: &str =
    "Listing Bunny Storage Zones via the API is not supported. Please enter the zone name manually.";
const LOCATION_WITHOUT_BUCKET: &str =
    "No bucket specified when requesting Bunny bucket location.";

/// Storage provider backed by Bunny.net Storage with Bunny CDN delivery.
///
/// Settings are read from the [`SettingsStore`] at the start of every
/// operation. Bulk operations run their items one after the other.
#[derive(Clone)]
pub struct BunnyStorageProvider {
    client: BunnyClient,
    settings: Arc<dyn SettingsStore>,
    temp_dir: PathBuf,
}

impl BunnyStorageProvider {
    /// Create a provider that stages temporary upload buffers in the OS temp dir
    pub fn new(client: BunnyClient, settings: Arc<dyn SettingsStore>) -> Self {
        Self::with_temp_dir(client, settings, std::env::temp_dir())
    }

    /// Create a provider that stages temporary upload buffers in `temp_dir`
    pub fn with_temp_dir(
        client: BunnyClient,
        settings: Arc<dyn SettingsStore>,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            settings,
            temp_dir: temp_dir.into(),
        }
    }

    pub fn client(&self) -> &BunnyClient {
        &self.client
    }

    /// Current settings snapshot
    pub fn settings(&self) -> ProviderSettings {
        self.settings.load()
    }

    /// Lower-case a region and strip everything outside `[a-z0-9-]`
    pub fn sanitize_region(&self, region: &str) -> String {
        Region::sanitize(region).as_str().to_string()
    }

    pub fn console_url(&self) -> &'static str {
        CONSOLE_URL
    }

    /// Stream wrappers are not available for Bunny storage
    pub fn register_stream_wrapper(&self, _region: &str) -> bool {
        false
    }

    pub fn stream_wrapper_protocol(&self) -> &'static str {
        STREAM_WRAPPER_PROTOCOL
    }

    /// Scheme and host that object URLs start with.
    ///
    /// A delivery domain without a scheme is served over https.
    pub fn url_prefix(&self, region: &str) -> String {
        let settings = self.settings();

        match settings.delivery_domain() {
            Some(domain) if domain.contains("://") => domain.to_string(),
            Some(domain) => format!("https://{}", domain.trim_start_matches('/')),
            None => self.client.build_url(
                &settings.storage_zone,
                "",
                Region::sanitize(region).as_str(),
            ),
        }
    }

    /// Domain part of object URLs for `bucket`, always with a trailing slash.
    pub fn url_domain(&self, bucket: &str, region: &str) -> String {
        let settings = self.settings();

        let domain = match settings.delivery_domain() {
            Some(domain) => domain.to_string(),
            None => self
                .client
                .build_url(bucket, "", Region::sanitize(region).as_str()),
        };

        format!("{}/", domain.trim_end_matches('/'))
    }

    /// Check that the configured storage zone exists and accepts writes.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> StorageResult<()> {
        let settings = self.settings();
        let zone = settings.storage_zone.as_str();

        if !self.bucket_exists(zone).await? {
            return Err(StorageError::ZoneNotFound {
                zone: zone.to_string(),
            });
        }

        match self
            .can_write(zone, CONNECTION_TEST_KEY, b"bunny connection test")
            .await
        {
            WriteProbe::Writable => {
                info!(zone, "Bunny connection test succeeded");
                Ok(())
            }
            WriteProbe::Failed(message) => Err(StorageError::WriteDenied {
                zone: zone.to_string(),
                message,
            }),
        }
    }

    /// Purge every cached object under the delivery domain.
    #[instrument(skip(self))]
    pub async fn purge_all(&self) -> StorageResult<()> {
        let settings = self.settings();

        let domain = settings
            .delivery_domain()
            .ok_or_else(|| StorageError::MissingConfiguration {
                message: "No Bunny CDN URL or custom domain is configured.".to_string(),
            })?;

        let url = join_url(domain, "*");
        self.client.purge_url(&settings.api_key, &url).await?;

        info!(%url, "Purged Bunny CDN cache");
        Ok(())
    }

    async fn probe(
        &self,
        settings: &ProviderSettings,
        zone: &str,
        key: &str,
    ) -> BunnyResult<StorageResponse> {
        self.client
            .head(zone, key, &settings.api_key, settings.region().as_str())
            .await
    }

    async fn exists(&self, zone: &str, key: &str) -> StorageResult<bool> {
        let settings = self.settings();

        match self.probe(&settings, zone, key).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Invalidate the CDN copy of `key`. Failures are logged and swallowed.
    async fn purge_cdn_for_key(&self, settings: &ProviderSettings, key: &str) {
        let Some(domain) = settings.delivery_domain() else {
            return;
        };

        let url = join_url(domain, key);

        match self.client.purge_url(&settings.api_key, &url).await {
            Ok(_) => debug!(%url, "Purged Bunny CDN cache for key"),
            Err(err) => warn!(%url, code = err.code(), "Bunny CDN purge failed: {}", err),
        }
    }

    async fn copy_object(&self, settings: &ProviderSettings, item: &CopyItem) -> StorageResult<()> {
        let region = settings.region();

        let source = self
            .client
            .get(
                &item.copy_source_bucket,
                &item.copy_source_key,
                &settings.api_key,
                region.as_str(),
            )
            .await?;

        let buffer = TempUploadBuffer::create(&self.temp_dir, &item.key, &source.body)?;

        self.client
            .upload(
                &item.bucket,
                &item.key,
                buffer.path(),
                &settings.api_key,
                region.as_str(),
                &HeaderMap::new(),
            )
            .await?;

        Ok(())
    }

    async fn write_probe(
        &self,
        settings: &ProviderSettings,
        zone: &str,
        key: &str,
        contents: &[u8],
    ) -> StorageResult<()> {
        let region = settings.region();
        let buffer = TempUploadBuffer::create(&self.temp_dir, key, contents)?;

        self.client
            .upload(
                zone,
                key,
                buffer.path(),
                &settings.api_key,
                region.as_str(),
                &HeaderMap::new(),
            )
            .await?;

        self.client
            .delete(zone, key, &settings.api_key, region.as_str())
            .await?;

        Ok(())
    }
}

#[async_trait]
impl StorageProvider for BunnyStorageProvider {
    fn capabilities(&self) -> ProviderCapabilities {
        CAPABILITIES
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        debug!(bucket, "Refusing to create Bunny storage zone");
        Err(StorageError::UnsupportedOperation {
            operation: "create_bucket".to_string(),
            reason: CREATE_BUCKET_UNSUPPORTED.to_string(),
        })
    }

    async fn list_buckets(&self) -> StorageResult<Vec<String>> {
        Err(StorageError::UnsupportedOperation {
            operation: "list_buckets".to_string(),
            reason: LIST_BUCKETS_UNSUPPORTED.to_string(),
        })
    }

    #[instrument(skip(self))]
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        self.exists(bucket, "").await
    }

    #[instrument(skip(self))]
    async fn bucket_location(&self, bucket: &str) -> StorageResult<String> {
        if bucket.is_empty() {
            return Err(StorageError::MissingConfiguration {
                message: LOCATION_WITHOUT_BUCKET.to_string(),
            });
        }

        let settings = self.settings();
        let response = self.probe(&settings, bucket, "").await?;

        // A header that sanitizes to nothing falls through to the setting.
        let region = response
            .header(STORAGE_ZONE_REGION_HEADER)
            .map(Region::sanitize)
            .filter(|region| !region.is_empty())
            .unwrap_or_else(|| settings.region());

        Ok(region.as_str().to_string())
    }

    #[instrument(skip(self))]
    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        self.exists(bucket, key).await
    }

    #[instrument(skip(self))]
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let settings = self.settings();

        let response = self
            .client
            .get(bucket, key, &settings.api_key, settings.region().as_str())
            .await?;

        Ok(response.body)
    }

    fn object_url(&self, bucket: &str, key: &str, timestamp: Option<u64>) -> String {
        let settings = self.settings();

        let base = match settings.delivery_domain() {
            Some(domain) => domain.to_string(),
            None => self
                .client
                .build_url(bucket, "", settings.region().as_str()),
        };

        let mut url = join_url(&base, key);

        if let Some(timestamp) = timestamp.filter(|t| *t != 0) {
            let delimiter = if url.contains('?') { '&' } else { '?' };
            url.push(delimiter);
            url.push_str("ver=");
            url.push_str(&timestamp.to_string());
        }

        url
    }

    #[instrument(skip(self))]
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> StorageResult<Vec<StorageObjectEntry>> {
        let settings = self.settings();

        let response = self
            .client
            .list(bucket, prefix, &settings.api_key, settings.region().as_str())
            .await?;

        Ok(StorageObjectEntry::from_listing(
            BunnyClient::decode_json_body(&response),
        ))
    }

    #[instrument(skip(self, request), fields(zone = %request.zone, key = %request.key))]
    async fn upload_object(&self, request: UploadRequest) -> StorageResult<()> {
        let settings = self.settings();

        let mut headers = HeaderMap::new();
        if let Some(content_type) = request.content_type.as_deref().filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(content_type)
                .map_err(|_| ValidationError::InvalidContentType(content_type.to_string()))?;
            headers.insert(CONTENT_TYPE, value);
        }

        // The buffer (if any) lives until the end of this function.
        let (source_path, _buffer) = match &request.source {
            UploadSource::File(path) => (path.clone(), None),
            UploadSource::Body(body) => {
                let buffer = TempUploadBuffer::create(&self.temp_dir, &request.key, body)?;
                (buffer.path().to_path_buf(), Some(buffer))
            }
        };

        self.client
            .upload(
                &request.zone,
                &request.key,
                &source_path,
                &settings.api_key,
                settings.region().as_str(),
                &headers,
            )
            .await?;

        self.purge_cdn_for_key(&settings, &request.key).await;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let settings = self.settings();

        self.client
            .delete(bucket, key, &settings.api_key, settings.region().as_str())
            .await?;

        self.purge_cdn_for_key(&settings, key).await;

        Ok(())
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn delete_objects(&self, bucket: &str, items: &[DeleteItem]) {
        for item in items.iter().filter(|item| !item.key.is_empty()) {
            if let Err(err) = self.delete_object(bucket, &item.key).await {
                warn!(key = %item.key, "Bunny delete failure: {}", err);
            }
        }
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn copy_objects(&self, items: &[CopyItem]) -> Vec<BulkFailure> {
        let settings = self.settings();
        let mut failures = Vec::new();

        for item in items {
            if let Err(err) = self.copy_object(&settings, item).await {
                warn!(key = %item.key, "Bunny copy failure: {}", err);
                failures.push(BulkFailure {
                    key: item.key.clone(),
                    message: err.to_string(),
                });
            }
        }

        failures
    }

    #[instrument(skip(self, locations), fields(count = locations.len()))]
    async fn list_keys(&self, locations: &[KeyLocation]) -> BTreeMap<u64, Vec<String>> {
        let mut keys = BTreeMap::new();

        for location in locations {
            let objects = match self.list_objects(&location.bucket, &location.prefix).await {
                Ok(objects) => objects,
                Err(err) => {
                    warn!(
                        attachment_id = location.attachment_id,
                        prefix = %location.prefix,
                        "Bunny list failure: {}",
                        err
                    );
                    continue;
                }
            };

            if objects.is_empty() {
                continue;
            }

            let prefix = normalize_key(&location.prefix);
            let found = objects
                .iter()
                .filter_map(|object| object.object_name.as_deref())
                .filter(|name| !name.is_empty())
                .map(|name| format!("{}{}", prefix, normalize_key(name)))
                .collect();

            keys.insert(location.attachment_id, found);
        }

        keys
    }

    #[instrument(skip(self, contents))]
    async fn can_write(&self, bucket: &str, key: &str, contents: &[u8]) -> WriteProbe {
        let settings = self.settings();

        match self.write_probe(&settings, bucket, key, contents).await {
            Ok(()) => WriteProbe::Writable,
            Err(err) => WriteProbe::Failed(err.to_string()),
        }
    }

    async fn update_object_acl(&self, update: &AclUpdate) -> StorageResult<()> {
        // Storage is private; public delivery goes through the CDN.
        debug!(key = %update.key, acl = %update.acl, "Ignoring ACL update");
        Ok(())
    }

    async fn update_object_acls(&self, _updates: &[AclUpdate]) -> Vec<BulkFailure> {
        Vec::new()
    }

    fn public_acl(&self) -> &'static str {
        PUBLIC_ACL
    }

    fn private_acl(&self) -> &'static str {
        PRIVATE_ACL
    }

    fn access_keys_set(&self) -> bool {
        self.settings().has_api_key()
    }

    fn needs_access_keys(&self) -> bool {
        if self.access_keys_set() {
            return false;
        }

        warn!(issue = "miss_access_key_id", "Bunny API key is not configured");
        true
    }
}

/// Join a base URL and a key with exactly one slash.
fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), normalize_key(key))
}

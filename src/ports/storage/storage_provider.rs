use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{
    errors::StorageResult,
    models::{
        AclUpdate, BulkFailure, CopyItem, DeleteItem, KeyLocation, StorageObjectEntry,
        UploadRequest, WriteProbe,
    },
};

/// Static capability flags a provider declares to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Buckets can be created through the API
    pub bucket_creation: bool,
    /// Buckets can be enumerated through the API
    pub bucket_listing: bool,
    /// Per-object ACLs are honoured
    pub object_acls: bool,
    pub block_public_access: bool,
    pub object_ownership: bool,
    /// A region must be chosen before the provider is usable
    pub region_required: bool,
    /// Regions the host may offer in a picker; empty when not enumerable
    pub regions: &'static [&'static str],
    pub stream_wrapper: bool,
    /// A secret key is needed in addition to the access key / API key
    pub requires_secret_key: bool,
}

/// Port for the host's uniform storage-provider contract.
///
/// Hard failures are returned as errors, soft probes as sentinels
/// (`bool`, [`WriteProbe`]) and bulk operations as failure lists.
#[async_trait]
pub trait StorageProvider: Send + Sync + 'static {
    /// Capability flags of this provider
    fn capabilities(&self) -> ProviderCapabilities;

    /// Create a bucket
    async fn create_bucket(&self, bucket: &str) -> StorageResult<()>;

    /// List all buckets visible to the credentials
    async fn list_buckets(&self) -> StorageResult<Vec<String>>;

    /// Check if a bucket exists
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Region the bucket lives in, empty when unknown
    async fn bucket_location(&self, bucket: &str) -> StorageResult<String>;

    /// Check if an object exists
    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Retrieve object data
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;

    /// Public URL of an object, with an optional cache-busting version
    fn object_url(&self, bucket: &str, key: &str, timestamp: Option<u64>) -> String;

    /// List objects under a prefix
    async fn list_objects(&self, bucket: &str, prefix: &str)
        -> StorageResult<Vec<StorageObjectEntry>>;

    /// Store an object from a file or in-memory content
    async fn upload_object(&self, request: UploadRequest) -> StorageResult<()>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Delete many objects; failures are logged, never returned
    async fn delete_objects(&self, bucket: &str, items: &[DeleteItem]);

    /// Copy many objects; returns the items that failed
    async fn copy_objects(&self, items: &[CopyItem]) -> Vec<BulkFailure>;

    /// Keys found under each location, indexed by attachment id
    async fn list_keys(&self, locations: &[KeyLocation]) -> BTreeMap<u64, Vec<String>>;

    /// Round-trip write probe
    async fn can_write(&self, bucket: &str, key: &str, contents: &[u8]) -> WriteProbe;

    /// Change the ACL of one object
    async fn update_object_acl(&self, update: &AclUpdate) -> StorageResult<()>;

    /// Change the ACL of many objects; returns the items that failed
    async fn update_object_acls(&self, updates: &[AclUpdate]) -> Vec<BulkFailure>;

    fn public_acl(&self) -> &'static str;

    fn private_acl(&self) -> &'static str;

    /// Whether credentials are configured
    fn access_keys_set(&self) -> bool;

    /// Whether credentials are still missing
    fn needs_access_keys(&self) -> bool {
        !self.access_keys_set()
    }
}

use std::path::PathBuf;

use bon::Builder;
use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used by the storage listing API (no offset, UTC).
const LISTING_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One entry of a storage zone directory listing.
///
/// Field names follow the storage API's JSON; every field is optional since
/// the listing is decoded on a best-effort basis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageObjectEntry {
    pub guid: Option<String>,
    pub storage_zone_name: Option<String>,
    pub path: Option<String>,
    pub object_name: Option<String>,
    pub length: Option<u64>,
    pub last_changed: Option<String>,
    pub date_created: Option<String>,
    pub is_directory: bool,
    pub checksum: Option<String>,
    pub content_type: Option<String>,
}

impl StorageObjectEntry {
    /// Decode a listing body. Anything other than a JSON array yields an
    /// empty listing and entries that do not decode are skipped.
    pub fn from_listing(value: serde_json::Value) -> Vec<Self> {
        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Last modification time, when the listing carried a parseable one.
    pub fn last_changed(&self) -> Option<NaiveDateTime> {
        self.last_changed
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, LISTING_TIMESTAMP_FORMAT).ok())
    }
}

/// Where the bytes of an upload come from.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadSource {
    /// A file that already exists on the local filesystem
    File(PathBuf),
    /// In-memory content; materialized into a temporary file for the upload
    Body(Bytes),
}

/// Request to upload a single object
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct UploadRequest {
    #[builder(into)]
    pub zone: String,
    #[builder(into)]
    pub key: String,
    pub source: UploadSource,
    #[builder(into)]
    pub content_type: Option<String>,
}

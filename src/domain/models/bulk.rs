use serde::{Deserialize, Serialize};

/// One object to remove in a bulk delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItem {
    pub key: String,
}

impl DeleteItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// One object to copy in a bulk copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CopyItem {
    /// Destination storage zone
    pub bucket: String,
    /// Destination key
    pub key: String,
    pub copy_source_bucket: String,
    pub copy_source_key: String,
}

/// A prefix to enumerate for one attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyLocation {
    pub attachment_id: u64,
    pub bucket: String,
    pub prefix: String,
}

/// Requested ACL change for one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclUpdate {
    pub bucket: String,
    pub key: String,
    pub acl: String,
}

/// A single failed item of a bulk operation. Successful items are never
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BulkFailure {
    pub key: String,
    pub message: String,
}

/// Outcome of a write probe (`can_write`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteProbe {
    Writable,
    /// The probe failed; carries the message of the failing step
    Failed(String),
}

impl WriteProbe {
    pub fn is_writable(&self) -> bool {
        matches!(self, WriteProbe::Writable)
    }
}

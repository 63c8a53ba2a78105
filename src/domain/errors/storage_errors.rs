/// Errors surfaced to the host by storage provider operations.
///
/// Messages coming back from the remote service are kept verbatim so the
/// host can show them in its own error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Operation the provider can never perform (e.g. creating a storage zone)
    UnsupportedOperation { operation: String, reason: String },

    /// A required setting is missing or empty
    MissingConfiguration { message: String },

    /// The configured storage zone does not exist
    ZoneNotFound { zone: String },

    /// A write probe against the storage zone failed
    WriteDenied { zone: String, message: String },

    /// The remote service (or the transport in front of it) rejected the request
    RemoteFailure {
        code: String,
        message: String,
        status: Option<u16>,
    },

    /// Validation error
    ValidationError { message: String },

    /// Local infrastructure error (temp files, filesystem)
    InfrastructureError {
        message: String,
        source: Option<String>, // Store error as string to allow Clone
    },
}

impl StorageError {
    /// HTTP status reported by the remote service, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorageError::RemoteFailure { status, .. } => *status,
            _ => None,
        }
    }

    /// Machine readable failure code.
    pub fn code(&self) -> &str {
        match self {
            StorageError::UnsupportedOperation { .. } => "unsupported_operation",
            StorageError::MissingConfiguration { .. } => "missing_configuration",
            StorageError::ZoneNotFound { .. } => "zone_not_found",
            StorageError::WriteDenied { .. } => "write_denied",
            StorageError::RemoteFailure { code, .. } => code,
            StorageError::ValidationError { .. } => "validation_error",
            StorageError::InfrastructureError { .. } => "infrastructure_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::UnsupportedOperation { reason, .. } => write!(f, "{}", reason),
            StorageError::MissingConfiguration { message } => write!(f, "{}", message),
            StorageError::ZoneNotFound { zone } => {
                write!(f, "Storage Zone not found: {}", zone)
            }
            StorageError::WriteDenied { message, .. } => write!(f, "{}", message),
            StorageError::RemoteFailure { message, .. } => write!(f, "{}", message),
            StorageError::ValidationError { message } => {
                write!(f, "Validation error: {}", message)
            }
            StorageError::InfrastructureError { message, .. } => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

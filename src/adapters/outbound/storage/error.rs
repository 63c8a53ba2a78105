use std::{io, path::PathBuf};

use thiserror::Error as ThisError;

use crate::domain::errors::{StorageError, ValidationError};

/// Failures of a single exchange with the Bunny storage or purge APIs.
#[derive(ThisError, Debug)]
pub enum BunnyError {
    #[error("Missing Bunny Storage Zone name.")]
    MissingStorageZone,

    #[error("Missing Bunny API key.")]
    MissingApiKey,

    #[error("Invalid Bunny API key.")]
    InvalidApiKey,

    #[error("No URL supplied for Bunny CDN purge.")]
    MissingUrl,

    #[error("Source file does not exist: {}", .path.display())]
    MissingSourceFile { path: PathBuf },

    #[error("Bunny API request failed: {reason} ({status})")]
    Http {
        status: u16,
        reason: String,
        body: String,
        url: String,
    },

    #[error("Failed to purge Bunny CDN cache: {reason} ({status})")]
    PurgeFailed {
        status: u16,
        reason: String,
        body: String,
        url: String,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BunnyError {
    /// Machine readable failure code
    pub fn code(&self) -> &'static str {
        match self {
            BunnyError::MissingStorageZone => "bunny_missing_storage_zone",
            BunnyError::MissingApiKey => "bunny_missing_api_key",
            BunnyError::InvalidApiKey => "bunny_invalid_api_key",
            BunnyError::MissingUrl => "bunny_missing_url",
            BunnyError::MissingSourceFile { .. } => "bunny_missing_source_file",
            BunnyError::Http { .. } => "bunny_http_error",
            BunnyError::PurgeFailed { .. } => "bunny_purge_failed",
            BunnyError::Transport(_) => "bunny_transport_error",
            BunnyError::Io(_) => "bunny_io_error",
        }
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            BunnyError::Http { status, .. } | BunnyError::PurgeFailed { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Body returned with a rejected request
    pub fn response_body(&self) -> Option<&str> {
        match self {
            BunnyError::Http { body, .. } | BunnyError::PurgeFailed { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Target URL of a rejected request
    pub fn url(&self) -> Option<&str> {
        match self {
            BunnyError::Http { url, .. } | BunnyError::PurgeFailed { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type BunnyResult<T> = Result<T, BunnyError>;

/// Convert client failures to domain storage errors, keeping the message
/// verbatim.
impl From<BunnyError> for StorageError {
    fn from(err: BunnyError) -> Self {
        StorageError::RemoteFailure {
            code: err.code().to_string(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Convert standard io::Error (temp buffers, local files) to domain errors
impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::InfrastructureError {
            message: format!("IO operation failed: {}", err),
            source: Some(err.to_string()),
        }
    }
}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::ValidationError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: u16) -> BunnyError {
        BunnyError::Http {
            status,
            reason: "Not Found".to_string(),
            body: "{\"HttpCode\":404}".to_string(),
            url: "https://storage.bunnycdn.com/media/a.jpg".to_string(),
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(BunnyError::MissingStorageZone.code(), "bunny_missing_storage_zone");
        assert_eq!(BunnyError::MissingApiKey.code(), "bunny_missing_api_key");
        assert_eq!(BunnyError::MissingUrl.code(), "bunny_missing_url");
        assert_eq!(http_error(404).code(), "bunny_http_error");
    }

    #[test]
    fn test_http_error_context() {
        let err = http_error(404);

        assert_eq!(err.to_string(), "Bunny API request failed: Not Found (404)");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.response_body(), Some("{\"HttpCode\":404}"));
        assert_eq!(err.url(), Some("https://storage.bunnycdn.com/media/a.jpg"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_precondition_errors_have_no_status() {
        assert_eq!(BunnyError::MissingApiKey.status(), None);
        assert_eq!(BunnyError::MissingApiKey.to_string(), "Missing Bunny API key.");
    }

    #[test]
    fn test_conversion_keeps_message_and_status() {
        let storage: StorageError = http_error(500).into();

        assert_eq!(storage.status(), Some(500));
        assert_eq!(storage.code(), "bunny_http_error");
        assert_eq!(storage.to_string(), "Bunny API request failed: Not Found (500)");
    }
}

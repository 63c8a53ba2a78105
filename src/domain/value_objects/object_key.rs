use crate::domain::errors::ValidationError;

const MAX_KEY_LENGTH: usize = 1024;

/// An object key (path) inside a storage zone.
///
/// Keys are always stored without leading slashes; `"/a/b.jpg"` and
/// `"a/b.jpg"` name the same object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Create a new ObjectKey, stripping leading slashes before validation
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = normalize_key(value.as_ref());

        if value.is_empty() {
            return Err(ValidationError::EmptyObjectKey);
        }

        if value.len() > MAX_KEY_LENGTH {
            return Err(ValidationError::ObjectKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LENGTH,
            });
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidObjectKeyCharacter('\0'));
        }

        Ok(Self(value.to_string()))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip every leading slash from a raw key.
pub fn normalize_key(key: &str) -> &str {
    key.trim_start_matches('/')
}

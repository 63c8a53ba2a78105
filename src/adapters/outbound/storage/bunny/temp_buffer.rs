use std::{
    io::{self, Write},
    path::Path,
};

use tempfile::NamedTempFile;

const FALLBACK_PREFIX: &str = "bunny-upload";

/// In-memory content materialized as a local file for a file-based upload.
///
/// The file is owned by the value and removed when it is dropped, so every
/// exit path of the owning operation cleans it up.
#[derive(Debug)]
pub struct TempUploadBuffer {
    file: NamedTempFile,
}

impl TempUploadBuffer {
    /// Write `contents` to a new file in `dir`, named after the key's basename.
    pub fn create(dir: &Path, key: &str, contents: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(&file_prefix(key))
            .tempfile_in(dir)?;

        file.write_all(contents)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

// Basename of the key, restricted to characters that are safe in file names.
fn file_prefix(key: &str) -> String {
    let basename = key.rsplit('/').next().unwrap_or_default();
    let prefix: String = basename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(64)
        .collect();

    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        format!("{}-", prefix)
    }
}

//! One-file-per-record JSON output
//!
//! Records land in a single directory, each under a file named after the
//! record's storage key.

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Characters that would break out of, or corrupt, a file name
const PATH_BREAKING: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Derives a storage key from a record's primary name
///
/// Path-breaking and control characters become spaces and the result is
/// trimmed. A name with nothing usable left maps to `untitled`.
///
/// # Examples
///
/// ```
/// use cinecrawl::output::storage_key;
///
/// assert_eq!(storage_key("Star Wars: Episode IV"), "Star Wars  Episode IV");
/// assert_eq!(storage_key("AC/DC"), "AC DC");
/// assert_eq!(storage_key(".."), "untitled");
/// ```
pub fn storage_key(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| {
            if PATH_BREAKING.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();
    let key = key.trim();

    if key.is_empty() || key.chars().all(|c| c == '.') {
        "untitled".to_string()
    } else {
        key.to_string()
    }
}

/// Writes each record to `<directory>/<key>.json`, overwriting existing files
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    /// Creates the sink, creating the output directory if needed
    pub fn create(directory: impl AsRef<Path>) -> OutputResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path a key is written to
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

#[async_trait]
impl RecordSink for JsonFileSink {
    async fn write(&self, key: &str, bytes: &[u8]) -> OutputResult<()> {
        let path = self.path_for(key);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))
    }
}

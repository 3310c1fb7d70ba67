//! Directory-backed storage: one file per storage key.
//!
//! ```text
//! {root}/
//!   {hex(storage key)}       # raw entry value
//!   {hex(storage key)}.tmp   # only while a write is in flight
//! ```
//!
//! Keys whose hex form exceeds 128 characters are stored as the first 64 hex
//! characters, a `-`, and the hex SHA-256 of the whole key. Plain hex names
//! never contain `-`, so the two forms cannot collide.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use super::{check_value_len, SecureStorage};
use crate::error::{StoreError, StoreResult};

/// File-per-key [`SecureStorage`] rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
    max_value_len: Option<usize>,
}

impl DirStorage {
    /// Create a storage rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_value_len: None,
        }
    }

    /// Reject values longer than `max` code points, like a platform keystore.
    pub fn with_max_value_len(mut self, max: usize) -> Self {
        self.max_value_len = Some(max);
        self
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(entry_name(key))
    }
}

/// Longest file name stored as plain hex; well under the usual 255-byte
/// limit once `.tmp` is appended.
const MAX_HEX_NAME: usize = 128;
const HEX_PREFIX: usize = 64;

fn entry_name(key: &str) -> String {
    let name = hex::encode(key.as_bytes());
    if name.len() <= MAX_HEX_NAME {
        return name;
    }
    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    format!("{}-{}", &name[..HEX_PREFIX], digest)
}

async fn write_atomic(path: &Path, key: &str, content: &str) -> StoreResult<()> {
    let temp_path = path.with_extension("tmp");

    fs::write(&temp_path, content)
        .await
        .map_err(|e| StoreError::storage(key, format!("failed to write temp file: {}", e)))?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| StoreError::storage(key, format!("failed to rename temp file: {}", e)))?;

    Ok(())
}

#[async_trait]
impl SecureStorage for DirStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.entry_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(key, format!("failed to read entry: {}", e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        check_value_len(key, value, self.max_value_len)?;

        fs::create_dir_all(&self.root).await.map_err(|e| {
            StoreError::storage(key, format!("failed to create storage directory: {}", e))
        })?;

        write_atomic(&self.entry_path(key), key, value).await?;
        debug!(key, "stored entry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(
                key,
                format!("failed to delete entry: {}", e),
            )),
        }
    }

    fn max_value_len(&self) -> Option<usize> {
        self.max_value_len
    }
}

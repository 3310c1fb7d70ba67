//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Default chunk size in Unicode code points.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Chunked store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of code points per stored chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `DUOSLOT_CHUNK_SIZE` | Chunk size in code points |
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            chunk_size: std::env::var("DUOSLOT_CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_chunk_size),
        }
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check the config against the per-value ceiling of the storage backend.
    pub fn validate(&self, storage_limit: Option<usize>) -> StoreResult<()> {
        if self.chunk_size == 0 {
            return Err(StoreError::Config {
                message: "chunk_size must be greater than zero".to_string(),
            });
        }
        if let Some(max) = storage_limit {
            if self.chunk_size > max {
                return Err(StoreError::Config {
                    message: format!(
                        "chunk_size {} exceeds storage value limit {}",
                        self.chunk_size, max
                    ),
                });
            }
        }
        Ok(())
    }
}

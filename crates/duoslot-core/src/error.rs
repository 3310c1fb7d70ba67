//! Error types for the chunked store.

/// Store errors.
///
/// Incomplete or corrupt slot data is not an error: the read path reports it
/// as a cache miss.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage rejected a get/set/delete.
    #[error("storage error on {key}: {message}")]
    Storage { key: String, message: String },

    /// Value exceeds the per-entry ceiling of the underlying storage.
    #[error("value for {key} too large: {len} > {max}")]
    ValueTooLarge { key: String, len: usize, max: usize },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Store was closed; no further writes are accepted.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Build a storage error for `key`.
    pub fn storage(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Whether a caller-side retry may succeed.
    ///
    /// The store itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StoreError::storage("k-A-chunk-0", "disk full");
        assert_eq!(err.to_string(), "storage error on k-A-chunk-0: disk full");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_non_retryable() {
        assert!(!StoreError::Closed.is_retryable());
        assert!(!StoreError::Config {
            message: "chunk_size must be > 0".into()
        }
        .is_retryable());
        assert!(!StoreError::ValueTooLarge {
            key: "k".into(),
            len: 10,
            max: 5
        }
        .is_retryable());
    }
}

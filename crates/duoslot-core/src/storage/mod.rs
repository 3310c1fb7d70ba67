//! Underlying storage contract and bundled backends.
//!
//! The store only needs independent single-key get/set/delete. No
//! transactions, no rename, no listing.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};

mod dir;
mod memory;

pub use dir::DirStorage;
pub use memory::{MemoryStorage, StorageOp};

/// Small-value key-value storage the chunked store is layered on.
///
/// Each call must be atomic for its single key. Implementations own their
/// timeouts: a call that never resolves stalls that key's write queue.
#[async_trait]
pub trait SecureStorage: Send + Sync {
    /// Read a raw entry.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a raw entry.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a raw entry.
    ///
    /// Backends without delete support may keep this default. Shrinking
    /// values then leave orphaned chunks behind; they are never read.
    async fn delete(&self, _key: &str) -> StoreResult<()> {
        Ok(())
    }

    /// Per-entry ceiling in Unicode scalar values, if any.
    fn max_value_len(&self) -> Option<usize> {
        None
    }
}

/// Reject values longer than `max` code points.
pub(crate) fn check_value_len(key: &str, value: &str, max: Option<usize>) -> StoreResult<()> {
    if let Some(max) = max {
        let len = value.chars().count();
        if len > max {
            return Err(StoreError::ValueTooLarge {
                key: key.to_string(),
                len,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoDelete;

    #[async_trait]
    impl SecureStorage for NoDelete {
        async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_default_delete_is_noop() {
        let storage = NoDelete;
        storage.delete("anything").await.unwrap();
        assert_eq!(storage.max_value_len(), None);
    }

    #[test]
    fn test_check_value_len_counts_code_points() {
        // 3 code points, 12 bytes
        assert!(check_value_len("k", "😀😀😀", Some(3)).is_ok());
        let err = check_value_len("k", "😀😀😀😀", Some(3)).unwrap_err();
        assert_eq!(
            err,
            StoreError::ValueTooLarge {
                key: "k".into(),
                len: 4,
                max: 3
            }
        );
        assert!(check_value_len("k", &"x".repeat(10_000), None).is_ok());
    }
}

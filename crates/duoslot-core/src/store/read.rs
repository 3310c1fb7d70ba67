//! Read path: resolve the latest slot, validate it, fall back to the other.

use tracing::{debug, warn};

use super::codec::join_chunks;
use super::slot::{Slot, SlotStore};
use crate::error::StoreResult;
use crate::storage::SecureStorage;

pub(crate) async fn get_impl(storage: &dyn SecureStorage, key: &str) -> StoreResult<Option<String>> {
    let slots = SlotStore::new(storage, key);
    let latest = slots.latest_pointer().await?.unwrap_or(Slot::A);

    if let Some(value) = read_slot(&slots, key, latest).await? {
        debug!(key, slot = %latest, "cache hit");
        return Ok(Some(value));
    }

    let fallback = latest.opposite();
    let value = read_slot(&slots, key, fallback).await?;
    if value.is_some() {
        warn!(
            key,
            latest = %latest,
            fallback = %fallback,
            "latest slot unreadable, serving previous value"
        );
    } else {
        debug!(key, "cache miss");
    }
    Ok(value)
}

/// Read one slot in full, or `None` if it is incomplete or damaged.
///
/// Never returns a partial value.
async fn read_slot(slots: &SlotStore<'_>, key: &str, slot: Slot) -> StoreResult<Option<String>> {
    if !slots.is_complete(slot).await? {
        return Ok(None);
    }

    let Some(meta) = slots.metadata(slot).await? else {
        return Ok(None);
    };
    if meta.total_chunks == 0 {
        return Ok(None);
    }

    let mut chunks = Vec::with_capacity(meta.total_chunks);
    for index in 0..meta.total_chunks {
        match slots.chunk(slot, index).await? {
            // Only the empty value's single chunk may be empty.
            Some(chunk) if !chunk.is_empty() || meta.total_chunks == 1 => chunks.push(chunk),
            _ => {
                debug!(key, %slot, index, total = meta.total_chunks, "missing chunk");
                return Ok(None);
            }
        }
    }

    Ok(Some(join_chunks(&chunks)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::commit::commit_impl;

    #[tokio::test]
    async fn test_empty_storage_misses() {
        let storage = MemoryStorage::new();
        assert_eq!(get_impl(&storage, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reads_committed_value() {
        let storage = MemoryStorage::new();
        commit_impl(&storage, "k", "hello world", 3).await.unwrap();
        assert_eq!(
            get_impl(&storage, "k").await.unwrap().as_deref(),
            Some("hello world")
        );
    }

    #[tokio::test]
    async fn test_empty_value_roundtrip() {
        let storage = MemoryStorage::new();
        commit_impl(&storage, "k", "", 1024).await.unwrap();
        assert_eq!(storage.get_raw("k-B-chunk-0").as_deref(), Some(""));
        assert_eq!(get_impl(&storage, "k").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_missing_chunk_falls_back() {
        let storage = MemoryStorage::new();
        commit_impl(&storage, "k", "old", 2).await.unwrap();
        commit_impl(&storage, "k", "newer", 2).await.unwrap();

        storage.remove_raw("k-A-chunk-1");
        assert_eq!(get_impl(&storage, "k").await.unwrap().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_empty_chunk_in_multi_chunk_value_is_missing() {
        let storage = MemoryStorage::new();
        commit_impl(&storage, "k", "abcd", 2).await.unwrap();

        storage.insert_raw("k-B-chunk-1", "");
        assert_eq!(get_impl(&storage, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_incomplete_latest_falls_back() {
        let storage = MemoryStorage::new();
        commit_impl(&storage, "k", "v1", 1024).await.unwrap();
        commit_impl(&storage, "k", "v2", 1024).await.unwrap();

        storage.insert_raw("k-A-complete", "false");
        assert_eq!(get_impl(&storage, "k").await.unwrap().as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn test_both_incomplete_is_miss_not_error() {
        let storage = MemoryStorage::new();
        storage.insert_raw("k-A-complete", "false");
        storage.insert_raw("k-B-complete", "false");
        storage.insert_raw("k-B-metadata", r#"{"totalChunks":1}"#);
        storage.insert_raw("k-B-chunk-0", "stale");
        assert_eq!(get_impl(&storage, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_chunk_metadata_is_miss() {
        let storage = MemoryStorage::new();
        storage.insert_raw("k-latest", "A");
        storage.insert_raw("k-A-complete", "true");
        storage.insert_raw("k-A-metadata", r#"{"totalChunks":0}"#);
        assert_eq!(get_impl(&storage, "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let storage = MemoryStorage::new();
        commit_impl(&storage, "k", "v", 1024).await.unwrap();

        storage.fail_gets_matching("k-B-chunk-0", 1);
        assert!(get_impl(&storage, "k").await.is_err());
        assert_eq!(get_impl(&storage, "k").await.unwrap().as_deref(), Some("v"));
    }
}

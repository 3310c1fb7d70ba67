//! Chunked dual-slot store.
//!
//! Writes go through a per-key coalescing queue into the commit protocol;
//! reads go through the reconciler, which never returns a partial value.
//!
//! ```text
//! set ─▶ queue ─▶ commit ─▶ slot ─▶ SecureStorage
//! get ─▶ read ───────────▶ slot ─▶ SecureStorage
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::storage::SecureStorage;

mod codec;
mod commit;
mod keys;
mod queue;
mod read;
mod slot;
mod state;
mod stats;

pub use codec::{join_chunks, split_chunks};
pub use slot::Slot;
pub use state::SlotState;
pub use stats::StoreStats;

use queue::WriteQueue;
use slot::SlotStore;

/// Persistent key-value cache over a small-value [`SecureStorage`].
///
/// Cloning is cheap; clones share the same write queues.
#[derive(Clone)]
pub struct ChunkedStore {
    storage: Arc<dyn SecureStorage>,
    config: StoreConfig,
    queue: Arc<WriteQueue>,
}

impl std::fmt::Debug for ChunkedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedStore")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .field("closed", &self.queue.is_closed())
            .finish_non_exhaustive()
    }
}

impl ChunkedStore {
    /// Create a store over `storage`.
    ///
    /// Must be called inside a Tokio runtime; queued writes run on it.
    /// Fails if `config.chunk_size` is zero or exceeds the storage's
    /// per-value ceiling.
    pub fn new(storage: Arc<dyn SecureStorage>, config: StoreConfig) -> StoreResult<Self> {
        config.validate(storage.max_value_len())?;
        let queue = WriteQueue::new(Arc::clone(&storage), config.chunk_size)?;
        debug!(chunk_size = config.chunk_size, "opened chunked store");
        Ok(Self {
            storage,
            config,
            queue: Arc::new(queue),
        })
    }

    /// Register a callback for writes that fail after `set` returned.
    ///
    /// Failed writes never reach the `set` caller; without a hook they are
    /// only logged and counted. Clones share one write queue, so the hook
    /// applies to every clone and replaces any hook set through another.
    pub fn set_error_hook<F>(&self, hook: F)
    where
        F: Fn(&str, &StoreError) + Send + Sync + 'static,
    {
        self.queue.set_error_hook(Arc::new(hook));
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read the current value for `key`.
    ///
    /// Returns `None` when nothing complete is stored. Storage errors are
    /// returned as-is.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        read::get_impl(self.storage.as_ref(), key).await
    }

    /// Queue `value` for `key` and return immediately.
    ///
    /// If several values are queued for the same key before the writer gets
    /// to them, only the last one is written. The only error is
    /// [`StoreError::Closed`].
    pub fn set(&self, key: &str, value: impl Into<String>) -> StoreResult<()> {
        self.queue.enqueue(key, value.into())
    }

    /// Wait until writes queued for `key` so far have settled.
    pub async fn flush(&self, key: &str) {
        self.queue.flush(key).await;
    }

    /// Wait until writes queued for every key so far have settled.
    pub async fn flush_all(&self) {
        self.queue.flush_all().await;
    }

    /// Reject further writes and drain the queues.
    pub async fn close(&self) {
        self.queue.close().await;
    }

    /// Number of keys with a running writer.
    pub fn active_writers(&self) -> usize {
        self.queue.active_writers()
    }

    /// Write counters since the store was created.
    pub fn stats(&self) -> StoreStats {
        self.queue.stats.snapshot()
    }

    /// Classify the raw storage state of `key`.
    ///
    /// Reads storage directly; flush first for a settled view.
    pub async fn inspect(&self, key: &str) -> StoreResult<SlotState> {
        let slots = SlotStore::new(self.storage.as_ref(), key);
        let pointer = slots.latest_pointer().await?;
        let flag_a = slots.complete_flag(Slot::A).await?;
        let flag_b = slots.complete_flag(Slot::B).await?;
        Ok(SlotState::observe(
            pointer,
            flag_a.as_deref(),
            flag_b.as_deref(),
        ))
    }
}

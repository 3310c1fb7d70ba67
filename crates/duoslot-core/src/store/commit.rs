//! Commit protocol: write one value into the non-latest slot, then flip the
//! latest pointer.
//!
//! Every step is a single-key write, so the protocol may stop after any of
//! them. Until the final pointer write succeeds, readers keep seeing the
//! previous value; the half-written target is marked incomplete first and is
//! simply overwritten by the next attempt.

use tracing::debug;

use super::codec::split_chunks;
use super::slot::{Slot, SlotMetadata, SlotStore};
use crate::error::StoreResult;
use crate::storage::SecureStorage;

/// Run one commit of `value` under `key`. Returns the slot committed to.
pub(crate) async fn commit_impl(
    storage: &dyn SecureStorage,
    key: &str,
    value: &str,
    chunk_size: usize,
) -> StoreResult<Slot> {
    let slots = SlotStore::new(storage, key);

    let latest = slots.latest_pointer().await?.unwrap_or(Slot::A);
    let target = latest.opposite();

    // Must precede any chunk write to the target.
    slots.set_complete(target, false).await?;

    let chunks = split_chunks(value, chunk_size);
    for (index, chunk) in chunks.iter().enumerate() {
        slots.set_chunk(target, index, chunk).await?;
    }

    if let Some(previous) = slots.metadata(target).await? {
        for index in chunks.len()..previous.total_chunks {
            slots.delete_chunk(target, index).await?;
        }
        if previous.total_chunks > chunks.len() {
            debug!(
                key,
                slot = %target,
                pruned = previous.total_chunks - chunks.len(),
                "pruned orphaned chunks"
            );
        }
    }

    slots
        .set_metadata(
            target,
            SlotMetadata {
                total_chunks: chunks.len(),
            },
        )
        .await?;
    slots.set_complete(target, true).await?;

    // Commit point.
    slots.set_latest_pointer(target).await?;

    debug!(key, slot = %target, chunks = chunks.len(), "committed value");
    Ok(target)
}

//! Slot labels and raw per-slot storage access.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::keys;
use crate::error::{StoreError, StoreResult};
use crate::storage::SecureStorage;

/// One of the two physical locations a logical key's value can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// The other slot.
    pub fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Label as persisted in `{key}-latest`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Parse a persisted label. Anything but `"A"`/`"B"` is `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted `{key}-{slot}-metadata` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SlotMetadata {
    #[serde(rename = "totalChunks")]
    pub total_chunks: usize,
}

/// Raw get/set/delete for one logical key's slots.
///
/// Stateless; every call goes straight to storage and propagates its error.
pub(crate) struct SlotStore<'a> {
    storage: &'a dyn SecureStorage,
    key: &'a str,
}

impl<'a> SlotStore<'a> {
    pub(crate) fn new(storage: &'a dyn SecureStorage, key: &'a str) -> Self {
        Self { storage, key }
    }

    /// Current latest pointer; unparseable content counts as absent.
    pub(crate) async fn latest_pointer(&self) -> StoreResult<Option<Slot>> {
        let raw = self.storage.get(&keys::latest_key(self.key)).await?;
        Ok(raw.as_deref().and_then(|label| {
            let slot = Slot::parse(label);
            if slot.is_none() {
                warn!(key = self.key, label, "ignoring unrecognized latest pointer");
            }
            slot
        }))
    }

    pub(crate) async fn set_latest_pointer(&self, slot: Slot) -> StoreResult<()> {
        self.storage
            .set(&keys::latest_key(self.key), slot.as_str())
            .await
    }

    /// Slot metadata; corrupt JSON counts as absent.
    pub(crate) async fn metadata(&self, slot: Slot) -> StoreResult<Option<SlotMetadata>> {
        let raw = self.storage.get(&keys::metadata_key(self.key, slot)).await?;
        Ok(raw.and_then(|json| match serde_json::from_str(&json) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!(key = self.key, %slot, error = %e, "ignoring corrupt slot metadata");
                None
            }
        }))
    }

    pub(crate) async fn set_metadata(&self, slot: Slot, meta: SlotMetadata) -> StoreResult<()> {
        let json = serde_json::to_string(&meta)
            .map_err(|e| StoreError::storage(self.key, e))?;
        self.storage
            .set(&keys::metadata_key(self.key, slot), &json)
            .await
    }

    pub(crate) async fn chunk(&self, slot: Slot, index: usize) -> StoreResult<Option<String>> {
        self.storage
            .get(&keys::chunk_key(self.key, slot, index))
            .await
    }

    pub(crate) async fn set_chunk(&self, slot: Slot, index: usize, text: &str) -> StoreResult<()> {
        self.storage
            .set(&keys::chunk_key(self.key, slot, index), text)
            .await
    }

    pub(crate) async fn delete_chunk(&self, slot: Slot, index: usize) -> StoreResult<()> {
        self.storage
            .delete(&keys::chunk_key(self.key, slot, index))
            .await
    }

    /// Raw complete flag: `"true"`, `"false"`, or absent.
    pub(crate) async fn complete_flag(&self, slot: Slot) -> StoreResult<Option<String>> {
        self.storage.get(&keys::complete_key(self.key, slot)).await
    }

    pub(crate) async fn is_complete(&self, slot: Slot) -> StoreResult<bool> {
        Ok(self.complete_flag(slot).await?.as_deref() == Some("true"))
    }

    pub(crate) async fn set_complete(&self, slot: Slot, complete: bool) -> StoreResult<()> {
        let flag = if complete { "true" } else { "false" };
        self.storage
            .set(&keys::complete_key(self.key, slot), flag)
            .await
    }
}

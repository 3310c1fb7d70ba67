//! Crash-safe chunked key-value cache over small-value secure storage.
//!
//! Platform secure stores (keychains, keystores) typically cap the size of a
//! single entry at a few kilobytes and offer no multi-key transactions. This
//! crate stores values of arbitrary size on top of such a store by:
//!
//! - splitting each value into fixed-size chunks (by Unicode code point)
//! - writing every new value into the slot (`A` or `B`) that is *not* current
//! - committing by flipping a single `{key}-latest` pointer, only after the
//!   new slot is fully written and marked complete
//!
//! A reader therefore never observes a torn value: an interrupted write leaves
//! the previous slot intact and readable.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use duoslot_core::{ChunkedStore, MemoryStorage, StoreConfig};
//!
//! # async fn example() -> duoslot_core::StoreResult<()> {
//! let store = ChunkedStore::new(Arc::new(MemoryStorage::new()), StoreConfig::default())?;
//!
//! // Fire-and-forget: the write is queued and coalesced per key.
//! store.set("session-jwt", "eyJhbGciOi...")?;
//! store.flush("session-jwt").await;
//!
//! assert_eq!(store.get("session-jwt").await?.as_deref(), Some("eyJhbGciOi..."));
//! # Ok(())
//! # }
//! ```
//!
//! # Storage Layout
//!
//! | Storage key | Content |
//! |-------------|---------|
//! | `{key}-latest` | `"A"` or `"B"`, absent before the first commit |
//! | `{key}-{slot}-metadata` | `{"totalChunks": n}` |
//! | `{key}-{slot}-chunk-{i}` | chunk text, `0 <= i < n` |
//! | `{key}-{slot}-complete` | `"true"` or `"false"` |
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DUOSLOT_CHUNK_SIZE` | Chunk size in code points (default: 1024) |

pub mod config;
pub mod error;
pub mod storage;
pub mod store;

pub use config::{StoreConfig, DEFAULT_CHUNK_SIZE};
pub use error::{StoreError, StoreResult};
pub use storage::{DirStorage, MemoryStorage, SecureStorage, StorageOp};
pub use store::{join_chunks, split_chunks, ChunkedStore, Slot, SlotState, StoreStats};

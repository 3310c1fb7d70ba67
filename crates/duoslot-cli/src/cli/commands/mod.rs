use std::sync::Arc;

use anyhow::Context;
use duoslot_core::{ChunkedStore, DirStorage, StoreConfig};

use super::args::StoreArgs;

mod dispatch;
pub mod get;
pub mod inspect;
pub mod set;

pub use dispatch::dispatch;

pub(crate) fn open_store(args: &StoreArgs) -> anyhow::Result<ChunkedStore> {
    let mut storage = DirStorage::new(&args.dir);
    if let Some(max) = args.max_value_len {
        storage = storage.with_max_value_len(max);
    }
    let config = StoreConfig::default().with_chunk_size(args.chunk_size);
    ChunkedStore::new(Arc::new(storage), config)
        .with_context(|| format!("failed to open store at {}", args.dir.display()))
}

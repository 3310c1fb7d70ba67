//! Write-path counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters, updated by the per-key writer tasks.
#[derive(Debug, Default)]
pub(crate) struct StatsInner {
    writes_committed: AtomicU64,
    writes_failed: AtomicU64,
    writes_coalesced: AtomicU64,
}

impl StatsInner {
    pub(crate) fn record_committed(&self) {
        self.writes_committed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.writes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self, n: u64) {
        self.writes_coalesced.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StoreStats {
        StoreStats {
            writes_committed: self.writes_committed.load(Ordering::Relaxed),
            writes_failed: self.writes_failed.load(Ordering::Relaxed),
            writes_coalesced: self.writes_coalesced.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the store's write counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Commits that advanced a latest pointer.
    pub writes_committed: u64,
    /// Commits aborted by a storage error.
    pub writes_failed: u64,
    /// Queued values superseded before they were written.
    pub writes_coalesced: u64,
}

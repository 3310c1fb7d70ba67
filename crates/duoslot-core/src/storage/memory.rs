//! In-process storage backend with fault injection.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{check_value_len, SecureStorage};
use crate::error::{StoreError, StoreResult};

/// A mutating call observed by [`MemoryStorage`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: String, value: String },
    Delete { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultOp {
    Get,
    Set,
    Delete,
}

#[derive(Debug)]
struct Fault {
    op: FaultOp,
    pattern: String,
    skip: usize,
    remaining: usize,
}

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    ops: Vec<StorageOp>,
    faults: Vec<Fault>,
}

impl Inner {
    /// Consume one matching fault, if any is armed.
    fn trip(&mut self, op: FaultOp, key: &str) -> StoreResult<()> {
        let hit = self
            .faults
            .iter_mut()
            .find(|f| f.op == op && f.remaining > 0 && key.contains(&f.pattern));
        match hit {
            Some(fault) if fault.skip > 0 => {
                fault.skip -= 1;
                Ok(())
            }
            Some(fault) => {
                fault.remaining -= 1;
                Err(StoreError::storage(key, "injected fault"))
            }
            None => Ok(()),
        }
    }
}

/// In-memory [`SecureStorage`].
///
/// Clones share the same entries, so a test can keep a handle for inspection
/// while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
    max_value_len: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that rejects values longer than `max` code points.
    pub fn with_max_value_len(max: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_value_len: Some(max),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fail the next `times` sets whose key contains `pattern`.
    pub fn fail_sets_matching(&self, pattern: impl Into<String>, times: usize) {
        self.arm(FaultOp::Set, pattern.into(), 0, times);
    }

    /// Let `skip` sets whose key contains `pattern` through, then fail the
    /// next `times` of them.
    pub fn fail_sets_matching_after(&self, pattern: impl Into<String>, skip: usize, times: usize) {
        self.arm(FaultOp::Set, pattern.into(), skip, times);
    }

    /// Fail the next `times` gets whose key contains `pattern`.
    pub fn fail_gets_matching(&self, pattern: impl Into<String>, times: usize) {
        self.arm(FaultOp::Get, pattern.into(), 0, times);
    }

    /// Fail the next `times` deletes whose key contains `pattern`.
    pub fn fail_deletes_matching(&self, pattern: impl Into<String>, times: usize) {
        self.arm(FaultOp::Delete, pattern.into(), 0, times);
    }

    fn arm(&self, op: FaultOp, pattern: String, skip: usize, remaining: usize) {
        self.lock().faults.push(Fault {
            op,
            pattern,
            skip,
            remaining,
        });
    }

    /// Disarm all pending faults.
    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Copy of every stored entry.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().entries.clone()
    }

    /// Read an entry, bypassing faults.
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.lock().entries.get(key).cloned()
    }

    /// Write an entry, bypassing faults and the operation log.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().entries.insert(key.into(), value.into());
    }

    /// Remove an entry, bypassing faults and the operation log.
    pub fn remove_raw(&self, key: &str) -> Option<String> {
        self.lock().entries.remove(key)
    }

    /// Successful mutating calls, oldest first.
    pub fn operations(&self) -> Vec<StorageOp> {
        self.lock().ops.clone()
    }

    /// Forget the recorded operation log.
    pub fn clear_operations(&self) {
        self.lock().ops.clear();
    }
}

#[async_trait]
impl SecureStorage for MemoryStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut inner = self.lock();
        inner.trip(FaultOp::Get, key)?;
        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        check_value_len(key, value, self.max_value_len)?;
        let mut inner = self.lock();
        inner.trip(FaultOp::Set, key)?;
        inner.entries.insert(key.to_string(), value.to_string());
        inner.ops.push(StorageOp::Set {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.trip(FaultOp::Delete, key)?;
        inner.entries.remove(key);
        inner.ops.push(StorageOp::Delete {
            key: key.to_string(),
        });
        Ok(())
    }

    fn max_value_len(&self) -> Option<usize> {
        self.max_value_len
    }
}

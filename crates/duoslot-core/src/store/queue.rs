//! Per-key write queue.
//!
//! Each logical key with pending writes has one writer task fed by an
//! unbounded channel. The writer drains whatever is queued, keeps only the
//! most recent value, commits it, and repeats until the channel is empty.
//! Superseded values are dropped without being written.
//!
//! Enqueue and writer exit both take the registry lock, so a message is
//! never sent to a writer that has already decided to stop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::commit::commit_impl;
use super::stats::StatsInner;
use crate::error::{StoreError, StoreResult};
use crate::storage::SecureStorage;

/// Callback for writes that failed after `set` returned.
pub(crate) type ErrorHook = Arc<dyn Fn(&str, &StoreError) + Send + Sync>;

enum Message {
    Write(String),
    Flush(oneshot::Sender<()>),
}

/// Messages drained in one pass of a writer.
#[derive(Default)]
struct Batch {
    value: Option<String>,
    superseded: u64,
    waiters: Vec<oneshot::Sender<()>>,
}

impl Batch {
    fn absorb(&mut self, msg: Message) {
        match msg {
            Message::Write(value) => {
                if self.value.replace(value).is_some() {
                    self.superseded += 1;
                }
            }
            Message::Flush(tx) => self.waiters.push(tx),
        }
    }
}

pub(crate) struct WriteQueue {
    storage: Arc<dyn SecureStorage>,
    chunk_size: usize,
    runtime: Handle,
    writers: Mutex<HashMap<String, mpsc::UnboundedSender<Message>>>,
    error_hook: Mutex<Option<ErrorHook>>,
    closed: AtomicBool,
    pub(crate) stats: StatsInner,
}

impl WriteQueue {
    pub(crate) fn new(storage: Arc<dyn SecureStorage>, chunk_size: usize) -> StoreResult<Self> {
        let runtime = Handle::try_current().map_err(|e| StoreError::Config {
            message: format!("store must be created inside a Tokio runtime: {}", e),
        })?;
        Ok(Self {
            storage,
            chunk_size,
            runtime,
            writers: Mutex::new(HashMap::new()),
            error_hook: Mutex::new(None),
            closed: AtomicBool::new(false),
            stats: StatsInner::default(),
        })
    }

    fn lock_writers(&self) -> MutexGuard<'_, HashMap<String, mpsc::UnboundedSender<Message>>> {
        self.writers.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_error_hook(&self, hook: ErrorHook) {
        *self.error_hook.lock().unwrap_or_else(|e| e.into_inner()) = Some(hook);
    }

    fn error_hook(&self) -> Option<ErrorHook> {
        self.error_hook
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Queue `value` for `key` without waiting for it to be written.
    pub(crate) fn enqueue(self: &Arc<Self>, key: &str, value: String) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }

        let mut writers = self.lock_writers();
        let msg = match writers.get(key) {
            Some(tx) => match tx.send(Message::Write(value)) {
                Ok(()) => return Ok(()),
                // Writer died (panicking error hook); replace it.
                Err(mpsc::error::SendError(msg)) => msg,
            },
            None => Message::Write(value),
        };

        let (tx, rx) = mpsc::unbounded_channel();
        // rx is alive, so this cannot fail.
        let _ = tx.send(msg);
        writers.insert(key.to_string(), tx);
        drop(writers);

        debug!(key, "started writer");
        self.runtime
            .spawn(Arc::clone(self).run_writer(key.to_string(), rx));
        Ok(())
    }

    /// Wait until every value queued for `key` so far has been handled.
    pub(crate) async fn flush(&self, key: &str) {
        let done = {
            let writers = self.lock_writers();
            let Some(tx) = writers.get(key) else {
                return;
            };
            let (done_tx, done_rx) = oneshot::channel();
            if tx.send(Message::Flush(done_tx)).is_err() {
                return;
            }
            done_rx
        };
        // Err only if the writer died; nothing is left to wait for then.
        let _ = done.await;
    }

    pub(crate) async fn flush_all(&self) {
        let keys: Vec<String> = self.lock_writers().keys().cloned().collect();
        for key in keys {
            self.flush(&key).await;
        }
    }

    pub(crate) async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.flush_all().await;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn active_writers(&self) -> usize {
        self.lock_writers().len()
    }

    async fn run_writer(self: Arc<Self>, key: String, mut rx: mpsc::UnboundedReceiver<Message>) {
        let mut carried: Option<Message> = None;

        loop {
            let mut batch = Batch::default();
            if let Some(msg) = carried.take() {
                batch.absorb(msg);
            }
            while let Ok(msg) = rx.try_recv() {
                batch.absorb(msg);
            }

            if batch.superseded > 0 {
                self.stats.record_coalesced(batch.superseded);
                debug!(key = %key, dropped = batch.superseded, "coalesced queued writes");
            }

            if let Some(value) = batch.value.take() {
                self.write(&key, &value).await;
            }

            for waiter in batch.waiters {
                let _ = waiter.send(());
            }

            let idle = {
                let mut writers = self.lock_writers();
                match rx.try_recv() {
                    Ok(msg) => {
                        carried = Some(msg);
                        false
                    }
                    Err(_) => {
                        writers.remove(&key);
                        true
                    }
                }
            };
            if idle {
                debug!(key = %key, "writer idle, exiting");
                break;
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        match commit_impl(self.storage.as_ref(), key, value, self.chunk_size).await {
            Ok(_) => self.stats.record_committed(),
            Err(e) => {
                self.stats.record_failed();
                warn!(key, error = %e, "write failed, previous value remains readable");
                if let Some(hook) = self.error_hook() {
                    hook(key, &e);
                }
            }
        }
    }
}

//! # Writer Loop
//!
//! Dedicated background thread that drains the handoff queue in
//! `batch_size` groups and commits each group to the store as one atomic,
//! durable write. Atomicity is per batch, not per backlog: a crash between
//! two commits leaves the earlier batch fully present and the later one
//! fully absent.
//!
//! A failed commit is retried with bounded, doubling backoff. When retries
//! exhaust, the batch cannot be dropped and cannot be re-queued, so the
//! writer records a fatal error, closes the queue, and stops.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info, warn};

use crate::domain::{IndexConfig, IndexError, IndexResult, TxLocationEntry};
use crate::ports::outbound::TxLocationStore;
use crate::queue::BoundedQueue;

/// Writer thread lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Running,
    Stopping,
    Stopped,
}

impl WriterState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WriterState::Running,
            1 => WriterState::Stopping,
            _ => WriterState::Stopped,
        }
    }
}

const STATE_RUNNING: u8 = 0;
const STATE_STOPPING: u8 = 1;
const STATE_STOPPED: u8 = 2;

/// Signalled by the worker on exit so shutdown can park instead of poll.
struct ExitSignal {
    done: Mutex<bool>,
    cond: Condvar,
}

impl ExitSignal {
    fn new() -> Self {
        Self {
            done: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    fn notify(&self) {
        let mut done = self.done.lock();
        *done = true;
        self.cond.notify_all();
    }

    /// Wait for the signal until `deadline`; true if it arrived in time.
    fn wait_until(&self, deadline: Instant) -> bool {
        let mut done = self.done.lock();
        while !*done {
            if self.cond.wait_until(&mut done, deadline).timed_out() {
                return *done;
            }
        }
        true
    }
}

/// Handle owning the writer thread.
pub struct WriterHandle {
    queue: Arc<BoundedQueue<TxLocationEntry>>,
    state: Arc<AtomicU8>,
    fatal: Arc<Mutex<Option<IndexError>>>,
    exit: Arc<ExitSignal>,
    thread: Option<JoinHandle<()>>,
}

impl WriterHandle {
    /// Spawn the writer thread draining `queue` into `store`.
    pub fn spawn(
        store: Arc<dyn TxLocationStore>,
        queue: Arc<BoundedQueue<TxLocationEntry>>,
        config: &IndexConfig,
    ) -> Self {
        let state = Arc::new(AtomicU8::new(STATE_RUNNING));
        let fatal = Arc::new(Mutex::new(None));
        let exit = Arc::new(ExitSignal::new());

        let worker = Worker {
            store,
            queue: Arc::clone(&queue),
            state: Arc::clone(&state),
            fatal: Arc::clone(&fatal),
            exit: Arc::clone(&exit),
            batch_size: config.batch_size.max(1),
            commit_retries: config.commit_retries.max(1),
            retry_backoff: config.retry_backoff,
        };

        let thread = thread::spawn(move || worker.run());

        Self {
            queue,
            state,
            fatal,
            exit,
            thread: Some(thread),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WriterState {
        WriterState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// The fatal error that stopped the writer, if any.
    pub fn fatal_error(&self) -> Option<IndexError> {
        self.fatal.lock().clone()
    }

    /// Run the shutdown state machine: `RUNNING -> STOPPING -> STOPPED`.
    ///
    /// Closing the queue wakes the writer even when the queue is empty; the
    /// writer drains and commits the remaining backlog (while the store is
    /// healthy) before stopping. The join is bounded by `grace`; exceeding
    /// it reports [`IndexError::ShutdownTimeout`] and leaves the thread
    /// detached as a last resort.
    pub fn shutdown(mut self, grace: Duration) -> IndexResult<()> {
        self.state
            .compare_exchange(
                STATE_RUNNING,
                STATE_STOPPING,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .ok();
        self.queue.close();

        // Park until the worker signals exit; no polling.
        let deadline = Instant::now() + grace;
        if !self.exit.wait_until(deadline) {
            warn!(grace_ms = grace.as_millis() as u64, "writer did not stop in time");
            return Err(IndexError::ShutdownTimeout {
                grace_ms: grace.as_millis() as u64,
            });
        }

        // The thread is at (or moments from) exit; this join cannot block
        // indefinitely.
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        info!("writer stopped");
        Ok(())
    }
}

struct Worker {
    store: Arc<dyn TxLocationStore>,
    queue: Arc<BoundedQueue<TxLocationEntry>>,
    state: Arc<AtomicU8>,
    fatal: Arc<Mutex<Option<IndexError>>>,
    exit: Arc<ExitSignal>,
    batch_size: usize,
    commit_retries: u32,
    retry_backoff: Duration,
}

impl Worker {
    fn run(self) {
        debug!(batch_size = self.batch_size, "writer loop started");
        loop {
            // Blocks while empty; empty result means closed and drained.
            let batch = self.queue.recv_batch(self.batch_size);
            if batch.is_empty() {
                break;
            }

            if let Err(err) = self.commit_with_retry(&batch) {
                error!(error = %err, "fatal indexing error, writer halting");
                *self.fatal.lock() = Some(err);
                // Unblock any producer stuck on a full queue; further sends
                // fail instead of feeding a dead pipeline.
                self.queue.close();
                break;
            }
        }
        self.state.store(STATE_STOPPED, Ordering::SeqCst);
        self.exit.notify();
        debug!("writer loop exited");
    }

    fn commit_with_retry(&self, batch: &[TxLocationEntry]) -> IndexResult<()> {
        let mut records = Vec::with_capacity(batch.len());
        for entry in batch {
            records.push((entry.txid.to_vec(), entry.encode()?));
        }

        let mut backoff = self.retry_backoff;
        let mut last_message = String::new();
        for attempt in 1..=self.commit_retries {
            match self.store.commit_batch(&records) {
                Ok(()) => {
                    debug!(
                        entries = batch.len(),
                        first = %batch[0].short_txid(),
                        "batch committed"
                    );
                    return Ok(());
                }
                Err(err) => {
                    warn!(attempt, error = %err, "batch commit failed");
                    last_message = err.to_string();
                    if attempt < self.commit_retries {
                        thread::sleep(backoff);
                        backoff = backoff.saturating_mul(2);
                    }
                }
            }
        }

        Err(IndexError::CommitExhausted {
            attempts: self.commit_retries,
            message: last_message,
        })
    }
}

//! # Bounded Handoff Queue
//!
//! Capacity-limited FIFO shared between the scanner (producer) and the
//! writer thread (consumer). `send` blocks while the queue is full,
//! `recv_batch` blocks while it is empty; both are cooperative waits on a
//! single mutex with two condition variables. Every state transition uses
//! `notify_all` so multiple waiters never lose a wake-up.
//!
//! Closing the queue replaces a bare stop flag: `close` wakes all waiters,
//! further sends fail, and a drained closed queue returns an empty batch to
//! tell the consumer to stop.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

/// Error returned by [`BoundedQueue::send`] on a closed queue.
///
/// Carries the rejected item back to the caller so it is never silently
/// dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct SendError<T>(pub T);

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Blocking bounded FIFO with broadcast wake-ups and close semantics.
pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Append an item, blocking while the queue is at capacity.
    ///
    /// Returns the item in `SendError` if the queue was closed before space
    /// became available.
    pub fn send(&self, item: T) -> Result<(), SendError<T>> {
        let mut inner = self.inner.lock();
        while inner.items.len() >= self.capacity && !inner.closed {
            self.not_full.wait(&mut inner);
        }
        if inner.closed {
            return Err(SendError(item));
        }
        inner.items.push_back(item);
        self.not_empty.notify_all();
        Ok(())
    }

    /// Remove and return up to `max_n` items in FIFO order, blocking while
    /// the queue is empty.
    ///
    /// An empty result means the queue is closed and fully drained; the
    /// consumer should stop.
    pub fn recv_batch(&self, max_n: usize) -> Vec<T> {
        let mut inner = self.inner.lock();
        while inner.items.is_empty() && !inner.closed {
            self.not_empty.wait(&mut inner);
        }
        let n = max_n.min(inner.items.len());
        let batch: Vec<T> = inner.items.drain(..n).collect();
        if !batch.is_empty() {
            self.not_full.notify_all();
        }
        batch
    }

    /// Close the queue, waking every blocked producer and consumer.
    ///
    /// Items already queued remain receivable; only new sends fail.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Current number of queued items.
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Whether the queue holds no items.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// Maximum number of items the queue will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

//! # Progress Cursor & Scanner
//!
//! Tracks the highest block number already handed to the queue and, on each
//! irreversibility advance, feeds newly irreversible entries into the
//! pipeline. The cursor lock is held across the whole scan-and-enqueue pass
//! so "what has been scanned" stays consistent with "what has been
//! enqueued"; only the host callback thread takes this lock.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::{IndexError, IndexResult, TxLocationEntry};
use crate::ports::outbound::ChainIndex;
use crate::queue::BoundedQueue;

/// Blocks fetched from the ephemeral index per scan step.
///
/// A large irreversibility jump is walked in bounded ranges so the scan
/// never materializes more than one chunk of entries ahead of the queue's
/// backpressure.
const SCAN_CHUNK_BLOCKS: u64 = 256;

/// Scans the host's ephemeral index into the handoff queue.
pub struct Scanner {
    chain_index: Arc<dyn ChainIndex>,
    queue: Arc<BoundedQueue<TxLocationEntry>>,
    /// Exclusive upper bound of blocks already scanned.
    cursor: Mutex<u64>,
}

impl Scanner {
    pub fn new(
        chain_index: Arc<dyn ChainIndex>,
        queue: Arc<BoundedQueue<TxLocationEntry>>,
    ) -> Self {
        Self {
            chain_index,
            queue,
            cursor: Mutex::new(0),
        }
    }

    /// Current cursor value (exclusive upper bound already processed).
    pub fn cursor(&self) -> u64 {
        *self.cursor.lock()
    }

    /// Enqueue every not-yet-queued entry with `block_num < height`, then
    /// advance the cursor to `height`.
    ///
    /// Blocks while the queue is full (backpressure on the caller). A
    /// height that has not advanced is a no-op. Returns the number of
    /// entries queued.
    pub fn on_irreversible(&self, height: u64) -> IndexResult<usize> {
        let mut cursor = self.cursor.lock();
        if height <= *cursor {
            trace!(height, cursor = *cursor, "irreversible height unchanged");
            return Ok(0);
        }

        let mut queued = 0usize;
        let mut from = *cursor;
        while from < height {
            let upper = height.min(from.saturating_add(SCAN_CHUNK_BLOCKS));
            for entry in self.chain_index.entries_below(from, upper) {
                // Blocks when the queue is at capacity. A closed queue means
                // the pipeline is shutting down or has failed fatally; the
                // entry stays in the ephemeral index, nothing is lost
                // silently.
                self.queue
                    .send(entry)
                    .map_err(|_| IndexError::QueueClosed)?;
                queued += 1;
            }
            from = upper;
        }

        *cursor = height;
        debug!(height, queued, "scanned irreversible entries into queue");
        Ok(queued)
    }
}

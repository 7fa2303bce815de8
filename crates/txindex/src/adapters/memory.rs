//! In-memory adapters.
//!
//! `MemoryChainIndex` is a reference implementation of the host's ephemeral
//! index; `MemoryLocationStore` is a store double with commit-failure
//! injection for pipeline tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::domain::{StoreError, TxLocationEntry};
use crate::ports::outbound::{ChainIndex, StoreIter, TxLocationStore};

/// Ephemeral transaction-location index keyed by `(block_num, position)`.
///
/// BTreeMap keeps entries in scan order, matching the host's
/// ordered-by-block iteration.
#[derive(Default)]
pub struct MemoryChainIndex {
    entries: RwLock<BTreeMap<(u64, u32), TxLocationEntry>>,
}

impl MemoryChainIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ChainIndex for MemoryChainIndex {
    fn record(&self, entry: TxLocationEntry) {
        self.entries
            .write()
            .insert((entry.block_num, entry.position_in_block), entry);
    }

    fn entries_below(&self, from_block: u64, upper_block: u64) -> Vec<TxLocationEntry> {
        if upper_block <= from_block {
            return Vec::new();
        }
        self.entries
            .read()
            .range((from_block, 0)..(upper_block, 0))
            .map(|(_, entry)| *entry)
            .collect()
    }
}

/// In-memory [`TxLocationStore`] with failure injection.
///
/// Failure knobs:
/// - [`fail_next_commits`](Self::fail_next_commits): the next N commit
///   calls fail, then commits succeed again (transient outage).
/// - [`fail_after_batches`](Self::fail_after_batches): every commit after
///   the Nth successful batch fails (persistent outage at a batch cut).
pub struct MemoryLocationStore {
    records: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
    committed_batches: Mutex<Vec<Vec<Vec<u8>>>>,
    transient_failures: AtomicU32,
    /// Negative means "never fail".
    fail_after: AtomicI64,
    commit_delay: Mutex<Option<Duration>>,
}

impl Default for MemoryLocationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            committed_batches: Mutex::new(Vec::new()),
            transient_failures: AtomicU32::new(0),
            fail_after: AtomicI64::new(-1),
            commit_delay: Mutex::new(None),
        }
    }

    /// Make the next `n` commit calls fail, then recover.
    pub fn fail_next_commits(&self, n: u32) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    /// Fail every commit after `n` successful batches.
    pub fn fail_after_batches(&self, n: i64) {
        self.fail_after.store(n, Ordering::SeqCst);
    }

    /// Sleep this long inside each commit (simulates a slow disk).
    pub fn set_commit_delay(&self, delay: Duration) {
        *self.commit_delay.lock() = Some(delay);
    }

    /// Snapshot of all persisted records.
    pub fn records(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.records.lock().clone()
    }

    /// Keys of each committed batch, in commit order.
    pub fn committed_batches(&self) -> Vec<Vec<Vec<u8>>> {
        self.committed_batches.lock().clone()
    }

    /// Number of persisted records.
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }
}

impl TxLocationStore for MemoryLocationStore {
    fn commit_batch(&self, records: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StoreError> {
        if let Some(delay) = *self.commit_delay.lock() {
            std::thread::sleep(delay);
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Commit {
                message: "injected transient failure".to_string(),
            });
        }

        let fail_after = self.fail_after.load(Ordering::SeqCst);
        if fail_after >= 0 && self.committed_batches.lock().len() as i64 >= fail_after {
            return Err(StoreError::Commit {
                message: "injected persistent failure".to_string(),
            });
        }

        // All-or-nothing: both locks are taken before any mutation, and the
        // whole batch is applied under them.
        let mut map = self.records.lock();
        let mut log = self.committed_batches.lock();
        for (key, value) in records {
            map.insert(key.clone(), value.clone());
        }
        log.push(records.iter().map(|(key, _)| key.clone()).collect());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.lock().get(key).cloned())
    }

    fn iter_all(&self) -> Result<StoreIter<'_>, StoreError> {
        let snapshot: Vec<_> = self
            .records
            .lock()
            .iter()
            .map(|(key, value)| Ok((key.clone(), value.clone())))
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }
}

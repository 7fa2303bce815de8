//! # Outbound Ports (Driven Ports)
//!
//! Interfaces the plugin requires from its collaborators: the persistent
//! store it writes and the host's ephemeral chain index it reads.

use crate::domain::{StoreError, TxLocationEntry};

/// Lazy iteration handle over raw store records.
///
/// Finite; restartable by reopening the store. Diagnostics only.
pub type StoreIter<'a> = Box<dyn Iterator<Item = Result<(Vec<u8>, Vec<u8>), StoreError>> + 'a>;

/// Abstract interface for the durable key-value store.
///
/// Production: `RocksDbLocationStore` (adapters/rocksdb_store.rs)
/// Testing: `MemoryLocationStore` (adapters/memory.rs)
///
/// The store is touched exclusively by the writer thread once the pipeline
/// is running, so implementations need no batch-level coordination beyond
/// the atomicity guarantee below.
pub trait TxLocationStore: Send + Sync {
    /// Durably apply all `(key, value)` pairs as a single atomic unit.
    ///
    /// Either every pair in the batch is persisted or none is; a crash mid
    /// commit must never leave a partially-written batch. Commits carry
    /// fsync-equivalent durability when the store is configured for sync
    /// writes.
    fn commit_batch(&self, records: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StoreError>;

    /// Single-key read (the entire query path of the index).
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Iterate every record in the store.
    fn iter_all(&self) -> Result<StoreIter<'_>, StoreError>;
}

/// Read/write interface over the host's ephemeral transaction-location
/// index (in-memory, rebuilt from chain replay).
///
/// Recording happens on the block-applied path, upstream of the scanner;
/// cleanup of scanned entries stays with the host.
pub trait ChainIndex: Send + Sync {
    /// Record a transaction location when its block is applied.
    fn record(&self, entry: TxLocationEntry);

    /// Entries with `from_block <= block_num < upper_block`, ordered by
    /// `(block_num, position_in_block)` ascending.
    fn entries_below(&self, from_block: u64, upper_block: u64) -> Vec<TxLocationEntry>;
}

/// Diagnostics helper: total record count via full iteration.
pub fn count_records(store: &dyn TxLocationStore) -> Result<usize, StoreError> {
    let mut count = 0;
    for item in store.iter_all()? {
        item?;
        count += 1;
    }
    Ok(count)
}

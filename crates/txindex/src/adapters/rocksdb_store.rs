//! # RocksDB Store Adapter
//!
//! Production implementation of the [`TxLocationStore`] port.
//!
//! ## Features
//!
//! - Atomic batch writes (WriteBatch)
//! - Snappy compression
//! - fsync on commit when `sync_writes` is set
//!
//! A single (default) column family holds the whole index: key = raw txid
//! bytes, value = version-tagged record encoding.

use std::path::Path;

use rocksdb::{IteratorMode, Options, WriteBatch, WriteOptions, DB};

use crate::domain::StoreError;
use crate::ports::outbound::{StoreIter, TxLocationStore};

/// RocksDB-backed transaction location store.
pub struct RocksDbLocationStore {
    db: DB,
    sync_writes: bool,
}

impl RocksDbLocationStore {
    /// Open or create the database at `path`.
    ///
    /// A failed open surfaces as [`StoreError::Open`]; callers treat it as
    /// fatal at plugin startup.
    pub fn open(path: impl AsRef<Path>, sync_writes: bool) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let db = DB::open(&opts, path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { db, sync_writes })
    }

    fn write_opts(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        write_opts
    }
}

impl TxLocationStore for RocksDbLocationStore {
    fn commit_batch(&self, records: &[(Vec<u8>, Vec<u8>)]) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for (key, value) in records {
            batch.put(key, value);
        }

        self.db
            .write_opt(batch, &self.write_opts())
            .map_err(|e| StoreError::Commit {
                message: e.to_string(),
            })
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.db.get(key).map_err(|e| StoreError::Read {
            message: e.to_string(),
        })
    }

    fn iter_all(&self) -> Result<StoreIter<'_>, StoreError> {
        let iter = self.db.iterator(IteratorMode::Start).map(|item| {
            item.map(|(key, value)| (key.to_vec(), value.to_vec()))
                .map_err(|e| StoreError::Read {
                    message: e.to_string(),
                })
        });
        Ok(Box::new(iter))
    }
}

//! # Plugin Adapter
//!
//! Ties the pipeline together behind the [`PluginLifecycle`] hooks the host
//! drives: open the store and start the writer on init, record and scan on
//! every applied block, run the shutdown state machine on teardown.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::adapters::rocksdb_store::RocksDbLocationStore;
use crate::domain::{IndexConfig, IndexError, IndexResult, TxId, TxLocationEntry};
use crate::ports::inbound::{AppliedBlock, PluginLifecycle};
use crate::ports::outbound::{count_records, ChainIndex, TxLocationStore};
use crate::queue::BoundedQueue;
use crate::service::scanner::Scanner;
use crate::service::writer::WriterHandle;

/// Durable transaction-id index plugin.
///
/// One instance owns one persistent store and one writer thread. The host
/// calls the lifecycle hooks from its plugin framework; block-applied
/// notifications arrive on a single host callback thread.
pub struct TxIndexPlugin {
    config: IndexConfig,
    chain_index: Arc<dyn ChainIndex>,
    /// Store injected before init (tests, embedders); `on_init` opens a
    /// RocksDB store at the configured path when absent.
    injected_store: Option<Arc<dyn TxLocationStore>>,
    store: Option<Arc<dyn TxLocationStore>>,
    scanner: Option<Scanner>,
    writer: Option<WriterHandle>,
}

impl TxIndexPlugin {
    /// Create a plugin that opens a RocksDB store at `config.store_path`.
    pub fn new(config: IndexConfig, chain_index: Arc<dyn ChainIndex>) -> Self {
        Self {
            config,
            chain_index,
            injected_store: None,
            store: None,
            scanner: None,
            writer: None,
        }
    }

    /// Create a plugin over a caller-provided store.
    pub fn with_store(
        config: IndexConfig,
        chain_index: Arc<dyn ChainIndex>,
        store: Arc<dyn TxLocationStore>,
    ) -> Self {
        Self {
            config,
            chain_index,
            injected_store: Some(store),
            store: None,
            scanner: None,
            writer: None,
        }
    }

    /// Read path: look up the durable location of a transaction.
    pub fn lookup(&self, txid: &TxId) -> IndexResult<Option<TxLocationEntry>> {
        let store = self.store.as_ref().ok_or_else(|| IndexError::NotRunning {
            reason: "store not opened".to_string(),
        })?;
        match store.get(txid)? {
            Some(value) => Ok(Some(TxLocationEntry::decode(&value)?)),
            None => Ok(None),
        }
    }

    /// Progress cursor (exclusive upper bound of scanned blocks).
    pub fn cursor(&self) -> u64 {
        self.scanner.as_ref().map(|s| s.cursor()).unwrap_or(0)
    }

    /// Surface a writer failure before accepting more work.
    fn check_writer_health(&self) -> IndexResult<()> {
        if let Some(writer) = &self.writer {
            if let Some(err) = writer.fatal_error() {
                error!(error = %err, "indexing halted, rejecting block-applied event");
                return Err(err);
            }
            Ok(())
        } else {
            Err(IndexError::NotRunning {
                reason: "writer not started".to_string(),
            })
        }
    }
}

impl PluginLifecycle for TxIndexPlugin {
    fn on_init(&mut self) -> IndexResult<()> {
        let store: Arc<dyn TxLocationStore> = match self.injected_store.take() {
            Some(store) => store,
            None => Arc::new(RocksDbLocationStore::open(
                &self.config.store_path,
                self.config.sync_writes,
            )?),
        };

        // Diagnostics pass over whatever survived previous runs.
        match count_records(store.as_ref()) {
            Ok(existing) => debug!(existing, "opened transaction index store"),
            Err(err) => warn!(error = %err, "could not scan existing records"),
        }

        let queue = Arc::new(BoundedQueue::with_capacity(self.config.queue_capacity));
        self.writer = Some(WriterHandle::spawn(
            Arc::clone(&store),
            Arc::clone(&queue),
            &self.config,
        ));
        self.scanner = Some(Scanner::new(Arc::clone(&self.chain_index), queue));
        self.store = Some(store);

        info!(
            path = %self.config.store_path.display(),
            queue_capacity = self.config.queue_capacity,
            batch_size = self.config.batch_size,
            "transaction index plugin initialized"
        );
        Ok(())
    }

    fn on_startup(&mut self) -> IndexResult<()> {
        Ok(())
    }

    fn on_block_applied(&mut self, block: &AppliedBlock) -> IndexResult<()> {
        self.check_writer_health()?;

        for (position, txid) in block.tx_ids.iter().enumerate() {
            self.chain_index.record(TxLocationEntry::new(
                *txid,
                block.block_num,
                position as u32,
            ));
        }

        let scanner = self.scanner.as_ref().ok_or_else(|| IndexError::NotRunning {
            reason: "scanner not started".to_string(),
        })?;
        scanner.on_irreversible(block.last_irreversible)?;
        Ok(())
    }

    fn on_shutdown(&mut self) -> IndexResult<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        if let Some(err) = writer.fatal_error() {
            warn!(error = %err, "shutting down after fatal indexing error");
        }
        writer.shutdown(self.config.shutdown_grace)?;
        info!("transaction index plugin stopped");
        Ok(())
    }
}

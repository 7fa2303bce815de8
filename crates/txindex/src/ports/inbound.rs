//! # Inbound Ports (Driving Ports)
//!
//! The narrow callback interface a host node drives the plugin through.
//! Core logic (queue, scanner, writer) stays a standalone library with no
//! dependency on the host's plugin framework; an adapter implementing
//! [`PluginLifecycle`] is the only host-facing seam.

use crate::domain::{IndexResult, TxId};

/// Snapshot of a newly applied block, as seen by the host's
/// block-application event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedBlock {
    /// Number of the applied block.
    pub block_num: u64,
    /// Transaction identifiers in block order.
    pub tx_ids: Vec<TxId>,
    /// The chain's current last-irreversible block height
    /// (monotonically non-decreasing).
    pub last_irreversible: u64,
}

/// Lifecycle hooks invoked by the host.
pub trait PluginLifecycle {
    /// Open the store, start the writer thread, and get ready to receive
    /// block-applied events. A store open failure is fatal: the plugin
    /// refuses to initialize.
    fn on_init(&mut self) -> IndexResult<()>;

    /// Deferred startup work. Currently a no-op.
    fn on_startup(&mut self) -> IndexResult<()>;

    /// Record the block's transactions in the host's ephemeral index, then
    /// scan newly irreversible entries into the pipeline.
    ///
    /// Blocks when the handoff queue is full: indexing applies backpressure
    /// to the block-applied path instead of dropping transactions.
    fn on_block_applied(&mut self, block: &AppliedBlock) -> IndexResult<()>;

    /// Stop the writer (draining the remaining backlog if the store is
    /// healthy) and join its thread within the configured grace period.
    fn on_shutdown(&mut self) -> IndexResult<()>;
}

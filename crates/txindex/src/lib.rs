//! # Transaction-ID Index Plugin
//!
//! Durable index of transaction identifiers. Once a transaction's containing
//! block becomes irreversible, a record mapping `txid -> (block_num,
//! position_in_block)` is committed to an embedded persistent store, so
//! lookups survive restarts independently of the in-memory chain state.
//!
//! ## Pipeline
//!
//! ```text
//! host callback thread                         writer thread
//! ─────────────────────                        ─────────────
//! on_block_applied ──→ ChainIndex.record
//!        │
//!        ↓
//!    Scanner (progress cursor)
//!        │  entries with block_num < irreversible height
//!        ↓
//!   [BoundedQueue] ──── recv_batch ──→ WriterLoop ──→ atomic batch commit
//!    (backpressure:                        │              (fsync semantics)
//!     send blocks when full)               └── wakes blocked producer
//! ```
//!
//! ## Guarantees
//!
//! - Every entry below the irreversible height is committed exactly once;
//!   the progress cursor never re-emits a scanned block number.
//! - Durability is atomic per batch: a crash between two commits leaves the
//!   earlier batch fully present and the later batch fully absent.
//! - A full queue blocks the block-applied path rather than dropping entries.
//! - Store open and commit failures surface at the plugin boundary; commit
//!   failures are retried with bounded backoff before becoming fatal.
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): entries, record encoding, config, errors
//! - **Ports Layer** (`ports/`): inbound lifecycle hooks, outbound store and
//!   chain-index interfaces
//! - **Queue** (`queue/`): bounded blocking handoff with close semantics
//! - **Service Layer** (`service/`): scanner, writer loop, plugin adapter
//! - **Adapters Layer** (`adapters/`): RocksDB store, in-memory test doubles

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod queue;
pub mod service;

pub use domain::{
    IndexConfig, IndexError, IndexResult, StoreError, TxId, TxLocationEntry, RECORD_VERSION,
};

pub use ports::{AppliedBlock, ChainIndex, PluginLifecycle, TxLocationStore};

pub use queue::{BoundedQueue, SendError};

pub use service::{Scanner, TxIndexPlugin, WriterHandle, WriterState};

pub use adapters::{MemoryChainIndex, MemoryLocationStore, RocksDbLocationStore};

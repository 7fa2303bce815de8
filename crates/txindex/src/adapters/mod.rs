//! Adapters layer: production RocksDB store and in-memory implementations.

pub mod memory;
pub mod rocksdb_store;

pub use memory::{MemoryChainIndex, MemoryLocationStore};
pub use rocksdb_store::RocksDbLocationStore;

//! Domain layer: entries, record encoding, configuration, and errors.

pub mod config;
pub mod entities;
pub mod errors;

pub use config::IndexConfig;
pub use entities::{TxId, TxLocationEntry, RECORD_VERSION};
pub use errors::{IndexError, IndexResult, StoreError};

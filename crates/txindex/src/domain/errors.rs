//! Error types for the transaction-id index.
//!
//! Store-facing failures always surface at the plugin boundary: an open
//! failure is fatal at init, a commit failure is retried with bounded
//! backoff and then escalated. Queue waits never fail, they only block.

use thiserror::Error;

/// Result type for indexing operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Failures of the persistent store adapter.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be opened or created at the configured path.
    #[error("failed to open store at {path}: {message}")]
    Open { path: String, message: String },

    /// An atomic batch write failed (transient or persistent).
    #[error("batch commit failed: {message}")]
    Commit { message: String },

    /// A read or iteration failed.
    #[error("store read failed: {message}")]
    Read { message: String },
}

/// Errors surfaced by the indexing pipeline.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// Store failure (open is fatal at init; reads surface as-is).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A batch commit kept failing after the configured retries.
    ///
    /// The writer cannot re-dequeue the batch without dropping it, so this
    /// halts indexing rather than silently losing entries.
    #[error("batch commit failed after {attempts} attempts: {message}")]
    CommitExhausted { attempts: u32, message: String },

    /// Record value could not be encoded or decoded.
    #[error("record encoding error: {message}")]
    Encoding { message: String },

    /// Persisted record carries a version this build does not understand.
    #[error("unsupported record version {found} (expected {expected})")]
    UnsupportedRecordVersion { found: u8, expected: u8 },

    /// The handoff queue was closed while an operation was in flight.
    #[error("indexing pipeline is shut down")]
    QueueClosed,

    /// The writer thread did not reach `STOPPED` within the grace period.
    #[error("writer thread did not stop within {grace_ms} ms")]
    ShutdownTimeout { grace_ms: u64 },

    /// The plugin was used before `on_init` or after a fatal error.
    #[error("index plugin is not running: {reason}")]
    NotRunning { reason: String },
}

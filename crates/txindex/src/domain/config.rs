//! Plugin configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the transaction-id index plugin.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Directory of the persistent store (required).
    pub store_path: PathBuf,
    /// Maximum entries held in the handoff queue (default: 10_000).
    ///
    /// A full queue blocks the block-applied path; backpressure bounds
    /// memory instead of dropping entries.
    pub queue_capacity: usize,
    /// Entries per atomic commit (default: 1).
    ///
    /// The small default trades batching efficiency for low persisted-data
    /// latency. It is a tuning knob, not a bug.
    pub batch_size: usize,
    /// Commit attempts before a batch failure becomes fatal (default: 5).
    pub commit_retries: u32,
    /// Base delay between commit retries; doubles per attempt (default: 50ms).
    pub retry_backoff: Duration,
    /// How long shutdown waits for the writer to stop (default: 5s).
    pub shutdown_grace: Duration,
    /// Fsync each commit (default: true; disabled only in tests).
    pub sync_writes: bool,
}

impl IndexConfig {
    /// Create a config with defaults rooted at `store_path`.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            ..Default::default()
        }
    }

    /// Create config for testing (tiny backoff, no fsync).
    pub fn for_testing(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            queue_capacity: 64,
            batch_size: 1,
            commit_retries: 3,
            retry_backoff: Duration::from_millis(1),
            shutdown_grace: Duration::from_secs(5),
            sync_writes: false,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("./data/txindex"),
            queue_capacity: 10_000,
            batch_size: 1,
            commit_retries: 5,
            retry_backoff: Duration::from_millis(50),
            shutdown_grace: Duration::from_secs(5),
            sync_writes: true,
        }
    }
}

//! # Domain Entities
//!
//! The transaction location entry and its persisted record encoding.

use serde::{Deserialize, Serialize};

use super::errors::IndexError;

/// Fixed-size transaction identifier (32 raw bytes).
pub type TxId = [u8; 32];

/// Version tag prefixed to every persisted record value.
///
/// The on-disk value is `[RECORD_VERSION] ++ bincode(TxLocationEntry)`.
/// Decoders reject unknown versions instead of misreading future layouts.
pub const RECORD_VERSION: u8 = 1;

/// Location of a transaction within the chain.
///
/// Immutable once created. Produced when a block is applied, read by the
/// scanner when that block becomes irreversible, and dropped only after the
/// writer has durably committed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxLocationEntry {
    /// Transaction identifier; also the store key.
    pub txid: TxId,
    /// Number of the containing block (monotonically increasing).
    pub block_num: u64,
    /// Zero-based index of the transaction within its block.
    pub position_in_block: u32,
}

impl TxLocationEntry {
    /// Create a new location entry.
    pub fn new(txid: TxId, block_num: u64, position_in_block: u32) -> Self {
        Self {
            txid,
            block_num,
            position_in_block,
        }
    }

    /// Encode this entry as a version-tagged store record value.
    pub fn encode(&self) -> Result<Vec<u8>, IndexError> {
        let payload = bincode::serialize(self).map_err(|e| IndexError::Encoding {
            message: e.to_string(),
        })?;
        let mut value = Vec::with_capacity(1 + payload.len());
        value.push(RECORD_VERSION);
        value.extend_from_slice(&payload);
        Ok(value)
    }

    /// Decode a store record value produced by [`encode`](Self::encode).
    pub fn decode(value: &[u8]) -> Result<Self, IndexError> {
        let (&version, payload) = value.split_first().ok_or_else(|| IndexError::Encoding {
            message: "empty record value".to_string(),
        })?;
        if version != RECORD_VERSION {
            return Err(IndexError::UnsupportedRecordVersion {
                found: version,
                expected: RECORD_VERSION,
            });
        }
        bincode::deserialize(payload).map_err(|e| IndexError::Encoding {
            message: e.to_string(),
        })
    }

    /// Short hex form of the txid for log output.
    pub fn short_txid(&self) -> String {
        hex::encode(&self.txid[..8])
    }
}

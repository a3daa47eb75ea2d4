// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

use crate::types::RecordId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MixedError {
    #[error("key {0} is out of range")]
    InvalidKey(usize),
    #[error("unsupported key width: {0} bytes")]
    InvalidWidth(usize),
    /// Slot already exists with another width and the policy forbids a rebuild.
    #[error("key {key} is already configured with width {current}, refusing {requested}")]
    WidthConflict {
        key: usize,
        current: usize,
        requested: usize,
    },
    #[error("record of {len} bytes is too short for key {key} (width {width})")]
    RecordTooShort { key: usize, width: usize, len: usize },
    #[error("unknown record: {0}")]
    UnknownRecord(RecordId),
    /// A bucket that must exist is gone. Signals a prior misuse, never repaired.
    #[error("index corruption on key {key}: no bucket holds the record for value 0x{value:x}")]
    Corruption { key: usize, value: u64 },
    /// Slots were (re)configured between `begin_change` and `end_change`.
    #[error("change on {0} was opened before the key slots were reconfigured")]
    StaleChange(RecordId),
    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for MixedError {
    fn from(e: serde_json::Error) -> Self {
        MixedError::Config(e.to_string())
    }
}

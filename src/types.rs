use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;

use crate::error::MixedError;

pub type FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;

// ─── Limits ─────────────────────────────────────────────────────────────────

/// Number of key slots. A key id doubles as the attribute's byte offset, so
/// every offset a byte can address gets a slot.
pub const MAX_KEYS: usize = 256;

// ─── RecordId ───────────────────────────────────────────────────────────────

/// Stable handle for a stored record. Ids are handed out in insertion order
/// and never reused, so ordering by id is ordering by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub(crate) u64);

impl RecordId {
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─── KeyWidth ───────────────────────────────────────────────────────────────

/// Size of an indexed attribute. Values are always widened to u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum KeyWidth {
    U8,
    U16,
    U32,
    U64,
}

impl KeyWidth {
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            KeyWidth::U8 => 1,
            KeyWidth::U16 => 2,
            KeyWidth::U32 => 4,
            KeyWidth::U64 => 8,
        }
    }
}

impl TryFrom<usize> for KeyWidth {
    type Error = MixedError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        match bytes {
            1 => Ok(KeyWidth::U8),
            2 => Ok(KeyWidth::U16),
            4 => Ok(KeyWidth::U32),
            8 => Ok(KeyWidth::U64),
            other => Err(MixedError::InvalidWidth(other)),
        }
    }
}

impl From<KeyWidth> for usize {
    fn from(w: KeyWidth) -> Self {
        w.bytes()
    }
}

// ─── Results ────────────────────────────────────────────────────────────────

/// Return value of `MixedIndex::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Added {
    pub id: RecordId,
    /// `false` when no key slot is configured. The record is stored anyway.
    pub indexed: bool,
}

/// Point-in-time counters, mostly for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub records: usize,
    /// (key id, width in bytes, bucket count) per configured slot.
    pub slots: Vec<(usize, usize, usize)>,
}

// ─── Config ─────────────────────────────────────────────────────────────────

/// What `configure` does when a slot already exists with a different width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconfigurePolicy {
    /// Re-extract every stored record under the new width.
    #[default]
    Rebuild,
    /// Fail with `MixedError::WidthConflict`.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub key: usize,
    pub width: KeyWidth,
}

/// Configuration for [`MixedIndex::with_config`](crate::MixedIndex::with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedConfig {
    /// Expected number of records. Used to size the record store's
    /// bookkeeping up front.
    ///
    /// Default: 0 (grow on demand).
    pub record_capacity: usize,
    pub reconfigure: ReconfigurePolicy,
    /// Slots configured at construction, in order.
    pub keys: Vec<KeySpec>,
}

impl Default for MixedConfig {
    fn default() -> Self {
        Self {
            record_capacity: 0,
            reconfigure: ReconfigurePolicy::Rebuild,
            keys: Vec::new(),
        }
    }
}

impl MixedConfig {
    /// Parse a config from JSON, e.g.
    /// `{"reconfigure": "reject", "keys": [{"key": 0, "width": 4}]}`.
    pub fn from_json(s: &str) -> Result<Self, MixedError> {
        Ok(serde_json::from_str(s)?)
    }
}

//! In-memory secondary indexing over fixed-layout records.
//!
//! A [`MixedIndex`] stores opaque byte records and keeps one hash index per
//! configured key slot. Slot `k` indexes the 1, 2, 4 or 8 byte little-endian
//! attribute found at byte offset `k` of every record. Records can be looked
//! up by any slot's value, and an indexed attribute can be changed in place
//! with [`MixedIndex::begin_change`] / [`MixedIndex::end_change`].
//!
//! ```
//! use mixed_index::MixedIndex;
//!
//! let mut index: MixedIndex<Vec<u8>> = MixedIndex::new();
//! index.configure(0, 4).unwrap();
//! let r1 = index.add(10u32.to_le_bytes().to_vec()).unwrap().id;
//!
//! let change = index.begin_change(r1).unwrap();
//! index.record_mut(r1).unwrap()[..4].copy_from_slice(&30u32.to_le_bytes());
//! index.end_change(change).unwrap();
//!
//! assert!(index.get(0, 10).is_none());
//! assert_eq!(index.get(0, 30).unwrap().ids(), &[r1]);
//! ```
pub mod error;
pub mod mixed;
pub mod record;
pub mod types;

pub use error::MixedError;
pub use mixed::{Bucket, Change, KeySlot, MixedIndex};
pub use types::{
    Added, FastMap, IndexStats, KeySpec, KeyWidth, MAX_KEYS, MixedConfig, RecordId,
    ReconfigurePolicy,
};

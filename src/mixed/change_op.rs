use arrayvec::ArrayVec;
use log::{error, trace};

use super::index::{MixedIndex, Snapshot};
use crate::error::MixedError;
use crate::record::{extract, store, value_key};
use crate::types::{MAX_KEYS, RecordId};

/// An open attribute change on one record.
///
/// Returned by [`MixedIndex::begin_change`] and consumed by
/// [`MixedIndex::end_change`]. Holds the attribute values seen at begin time,
/// so the index itself keeps no transaction state.
#[derive(Debug, Clone)]
#[must_use = "an open change must be passed to end_change"]
pub struct Change {
    id: RecordId,
    before: Snapshot,
    generation: u64,
}

impl Change {
    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Value captured for `key`, if that slot was configured at begin time.
    pub fn before(&self, key: usize) -> Option<u64> {
        self.before.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl<R: AsRef<[u8]>> MixedIndex<R> {
    // ════════════════════════════════════════════════════════════════════════
    // Change protocol
    // ════════════════════════════════════════════════════════════════════════

    /// Capture the current value of every indexed attribute of `id`.
    ///
    /// The caller then mutates the record (see [`record_mut`](Self::record_mut))
    /// and hands the `Change` to [`end_change`](Self::end_change). Slots must
    /// not be reconfigured while a change is open.
    pub fn begin_change(&self, id: RecordId) -> Result<Change, MixedError> {
        let record = self.store.get(id).ok_or(MixedError::UnknownRecord(id))?;
        let before = self.snapshot(record.as_ref())?;
        for (key, value) in &before {
            trace!("store state {key} (0x{value:08x}) for {id}");
        }
        Ok(Change {
            id,
            before,
            generation: self.generation,
        })
    }

    /// Re-file the record on every slot whose value moved since
    /// `begin_change`.
    ///
    /// Every new value is read before any slot is touched, so a record that
    /// no longer fits a slot fails with [`MixedError::RecordTooShort`] and
    /// leaves the index as it was.
    ///
    /// A missing old bucket, or an old bucket that doesn't hold the record,
    /// means the index was already inconsistent: the call stops at that slot
    /// with [`MixedError::Corruption`]. Slots handled before it stay updated.
    pub fn end_change(&mut self, change: Change) -> Result<(), MixedError> {
        let Change {
            id,
            before,
            generation,
        } = change;
        if generation != self.generation {
            return Err(MixedError::StaleChange(id));
        }
        let record = self
            .store
            .get(id)
            .ok_or(MixedError::UnknownRecord(id))?
            .as_ref();

        let mut moves = ArrayVec::<(usize, u64, u64), MAX_KEYS>::new();
        for &(key, old) in &before {
            let Some(slot) = self.keys[key].as_ref() else {
                continue;
            };
            let new = extract(key, slot.width(), record)?;
            if new != old {
                moves.push((key, old, new));
            }
        }

        for (key, old, new) in moves {
            let Some(slot) = self.keys[key].as_mut() else {
                continue;
            };
            if !slot.unfile(old, id) {
                error!(
                    "index corruption on key {key}: {id} not in bucket {}",
                    value_key(slot.width(), old)
                );
                return Err(MixedError::Corruption { key, value: old });
            }
            slot.file(new, id);
        }
        Ok(())
    }

    /// Run `f` on the record between `begin_change` and `end_change`.
    pub fn change<T>(
        &mut self,
        id: RecordId,
        f: impl FnOnce(&mut R) -> T,
    ) -> Result<T, MixedError> {
        let change = self.begin_change(id)?;
        let record = self
            .store
            .get_mut(id)
            .ok_or(MixedError::UnknownRecord(id))?;
        let out = f(record);
        self.end_change(change)?;
        Ok(out)
    }
}

impl<R: AsRef<[u8]> + AsMut<[u8]>> MixedIndex<R> {
    /// Overwrite the attribute behind `key` and re-file the record.
    pub fn set_value(&mut self, id: RecordId, key: usize, value: u64) -> Result<(), MixedError> {
        let width = self.key_width(key).ok_or(MixedError::InvalidKey(key))?;
        self.change(id, |record| store(key, width, record.as_mut(), value))?
    }
}

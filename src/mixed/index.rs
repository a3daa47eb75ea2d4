use arrayvec::ArrayVec;
use log::{debug, error};

use super::bucket::Bucket;
use super::key_slot::KeySlot;
use super::store::RecordStore;
use crate::error::MixedError;
use crate::record::{extract, value_key};
use crate::types::*;

/// Captured attribute values of one record, one entry per configured slot.
pub(crate) type Snapshot = ArrayVec<(usize, u64), MAX_KEYS>;

/// In-memory secondary index over fixed-layout records.
///
/// Every stored record sits, for every configured key slot, in exactly the
/// bucket matching its current attribute value. Records are opaque byte
/// blocks (`R: AsRef<[u8]>`); the index only reads them and hands them back
/// on [`remove`](Self::remove) or [`into_records`](Self::into_records).
///
/// Not synchronized. Every write takes `&mut self`; wrap the whole index in
/// a `Mutex` to share it across threads.
#[derive(Debug, Clone)]
pub struct MixedIndex<R> {
    pub(crate) keys: Vec<Option<KeySlot>>,
    pub(crate) store: RecordStore<R>,
    pub(crate) policy: ReconfigurePolicy,
    /// Bumped on every slot (re)configuration. Used to detect stale changes.
    pub(crate) generation: u64,
    /// Initial table size for new slots.
    capacity: usize,
}

impl<R> Default for MixedIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MixedIndex<R> {
    pub fn new() -> Self {
        Self::with_capacity(0, ReconfigurePolicy::default())
    }

    fn with_capacity(capacity: usize, policy: ReconfigurePolicy) -> Self {
        Self {
            keys: std::iter::repeat_with(|| None).take(MAX_KEYS).collect(),
            store: RecordStore::new(),
            policy,
            generation: 0,
            capacity,
        }
    }

    /// True if `key` and `width` (in bytes) would be accepted by `configure`.
    #[inline]
    pub fn key_check(key: usize, width: usize) -> bool {
        key < MAX_KEYS && KeyWidth::try_from(width).is_ok()
    }

    /// The slot for `key`, if configured. Lets callers walk its buckets.
    #[inline]
    pub fn key_slot(&self, key: usize) -> Option<&KeySlot> {
        self.keys.get(key)?.as_ref()
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = (usize, &KeySlot)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(key, slot)| slot.as_ref().map(|s| (key, s)))
    }

    #[inline]
    pub fn key_width(&self, key: usize) -> Option<KeyWidth> {
        self.key_slot(key).map(KeySlot::width)
    }

    pub fn configured_keys(&self) -> impl Iterator<Item = (usize, KeyWidth)> + '_ {
        self.slots().map(|(key, slot)| (key, slot.width()))
    }

    /// Drop a key slot and all of its buckets. Stored records are untouched.
    pub fn unconfigure(&mut self, key: usize) -> bool {
        match self.keys.get_mut(key).and_then(Option::take) {
            Some(_) => {
                self.generation += 1;
                debug!("key {key} unconfigured");
                true
            }
            None => false,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Record store access
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: RecordId) -> bool {
        self.store.get(id).is_some()
    }

    #[inline]
    pub fn record(&self, id: RecordId) -> Option<&R> {
        self.store.get(id)
    }

    /// Raw mutable access. Changing an indexed attribute through this
    /// reference must be bracketed by `begin_change`/`end_change`, or done
    /// through [`change`](Self::change).
    #[inline]
    pub fn record_mut(&mut self, id: RecordId) -> Option<&mut R> {
        self.store.get_mut(id)
    }

    /// All stored records in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (RecordId, &R)> + '_ {
        self.store.iter()
    }

    /// Tear the index down, handing the records back in insertion order.
    pub fn into_records(self) -> Vec<R> {
        self.store.into_records()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.store.len(),
            slots: self
                .slots()
                .map(|(key, slot)| (key, slot.width().bytes(), slot.bucket_count()))
                .collect(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Lookup
    // ════════════════════════════════════════════════════════════════════════

    /// Bucket for an exact value. `None` if the slot is unconfigured or no
    /// record currently has that value.
    #[inline]
    pub fn get(&self, key: usize, value: u64) -> Option<&Bucket> {
        self.key_slot(key)?.get(value)
    }

    /// Records in the bucket for `value`, in bucket order.
    pub fn get_records(&self, key: usize, value: u64) -> impl Iterator<Item = &R> + '_ {
        self.get(key, value)
            .into_iter()
            .flat_map(|bucket| bucket.iter())
            .filter_map(|id| self.store.get(id))
    }

    #[inline]
    pub fn get_first(&self, key: usize, value: u64) -> Option<&R> {
        self.get_records(key, value).next()
    }
}

impl<R: AsRef<[u8]>> MixedIndex<R> {
    /// Create an index and configure every slot listed in `config.keys`.
    pub fn with_config(config: MixedConfig) -> Result<Self, MixedError> {
        let mut index = Self::with_capacity(config.record_capacity, config.reconfigure);
        for spec in &config.keys {
            index.configure(spec.key, spec.width.bytes())?;
        }
        Ok(index)
    }

    /// Current value of every configured slot for `record`.
    pub(crate) fn snapshot(&self, record: &[u8]) -> Result<Snapshot, MixedError> {
        let mut values = Snapshot::new();
        for (key, slot) in self.slots() {
            values.push((key, extract(key, slot.width(), record)?));
        }
        Ok(values)
    }

    fn build_slot(&self, key: usize, width: KeyWidth) -> Result<KeySlot, MixedError> {
        let mut slot = KeySlot::with_capacity(width, self.capacity.max(self.store.len()));
        for (id, record) in self.store.iter() {
            slot.file(extract(key, width, record.as_ref())?, id);
        }
        Ok(slot)
    }

    /// Configure slot `key` to index a `width`-byte attribute at offset `key`.
    ///
    /// A new slot is filled from the records already stored. Changing the
    /// width of an existing slot rebuilds it or fails, per the
    /// [`ReconfigurePolicy`]. On error nothing changes.
    pub fn configure(&mut self, key: usize, width: usize) -> Result<(), MixedError> {
        if key >= MAX_KEYS {
            return Err(MixedError::InvalidKey(key));
        }
        let width = KeyWidth::try_from(width)?;

        if let Some(current) = self.key_width(key) {
            if current == width {
                return Ok(());
            }
            if self.policy == ReconfigurePolicy::Reject {
                return Err(MixedError::WidthConflict {
                    key,
                    current: current.bytes(),
                    requested: width.bytes(),
                });
            }
            debug!(
                "rebuilding key {key}: width {} -> {}",
                current.bytes(),
                width.bytes()
            );
        }

        let slot = self.build_slot(key, width)?;
        debug!(
            "key {key} configured (width {}, {} buckets)",
            width.bytes(),
            slot.bucket_count()
        );
        self.keys[key] = Some(slot);
        self.generation += 1;
        Ok(())
    }

    /// Store `record` and file it into every configured slot.
    ///
    /// A record too short for any slot is rejected before anything is stored.
    pub fn add(&mut self, record: R) -> Result<Added, MixedError> {
        let values = self.snapshot(record.as_ref())?;
        let id = self.store.push(record);
        for &(key, value) in &values {
            if let Some(slot) = self.keys[key].as_mut() {
                slot.file(value, id);
            }
        }
        Ok(Added {
            id,
            indexed: !values.is_empty(),
        })
    }

    /// Take `id` out of the store and out of the bucket for its current
    /// value on every slot. Other members of those buckets stay put.
    ///
    /// If a slot can't find the record where its bytes say it should be,
    /// the error is logged and that slot's table is swept for `id`, so no
    /// bucket keeps a removed record.
    pub fn remove(&mut self, id: RecordId) -> Option<R> {
        let record = self.store.remove(id)?;
        for (key, slot) in self.keys.iter_mut().enumerate() {
            let Some(slot) = slot else { continue };
            match extract(key, slot.width(), record.as_ref()) {
                Ok(value) if slot.unfile(value, id) => continue,
                Ok(value) => error!(
                    "index corruption on key {key}: {id} not in bucket {}",
                    value_key(slot.width(), value)
                ),
                Err(e) => error!("index corruption on key {key}: {id}: {e}"),
            }
            let swept = slot.purge(id);
            debug!("swept {swept} stale entries for {id} from key {key}");
        }
        Some(record)
    }
}

use super::bucket::Bucket;
use crate::types::{FastMap, KeyWidth, RecordId};

/// One configured index: an attribute width plus the table from widened
/// value to bucket. The table is the only owner of its buckets.
#[derive(Debug, Clone)]
pub struct KeySlot {
    width: KeyWidth,
    table: FastMap<u64, Bucket>,
}

impl KeySlot {
    pub(crate) fn with_capacity(width: KeyWidth, capacity: usize) -> Self {
        Self {
            width,
            table: FastMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    pub fn width(&self) -> KeyWidth {
        self.width
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn get(&self, value: u64) -> Option<&Bucket> {
        self.table.get(&value)
    }

    /// Locate-or-create the bucket for `value` and append `id`.
    #[inline]
    pub(crate) fn file(&mut self, value: u64, id: RecordId) {
        self.table.entry(value).or_insert_with(Bucket::new).push(id);
    }

    /// Take `id` out of the bucket for `value`, dropping the bucket if it
    /// ends up empty. Returns false if the bucket is missing or doesn't hold
    /// `id`.
    pub(crate) fn unfile(&mut self, value: u64, id: RecordId) -> bool {
        let Some(bucket) = self.table.get_mut(&value) else {
            return false;
        };
        if !bucket.remove(id) {
            return false;
        }
        if bucket.is_empty() {
            self.table.remove(&value);
        }
        true
    }

    /// Strip `id` from every bucket, dropping the ones left empty. Returns
    /// how many occurrences went away. Full table scan.
    pub(crate) fn purge(&mut self, id: RecordId) -> usize {
        let mut removed = 0;
        self.table.retain(|_, bucket| {
            while bucket.remove(id) {
                removed += 1;
            }
            !bucket.is_empty()
        });
        removed
    }

    /// Drop a whole bucket, leaving its records unindexed on this slot.
    #[cfg(test)]
    pub(crate) fn detach_bucket(&mut self, value: u64) -> Option<Bucket> {
        self.table.remove(&value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &Bucket)> + '_ {
        self.table.iter().map(|(v, b)| (*v, b))
    }
}

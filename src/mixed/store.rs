use std::collections::BTreeMap;

use crate::types::RecordId;

/// Master list of every stored record, independent of indexing.
///
/// Keyed by id, and ids are monotonic, so iteration order is insertion order.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: BTreeMap<RecordId, R>,
    next_id: u64,
}

impl<R> RecordStore<R> {
    pub(crate) fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn push(&mut self, record: R) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.insert(id, record);
        id
    }

    #[inline]
    pub(crate) fn remove(&mut self, id: RecordId) -> Option<R> {
        self.records.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.get(&id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut R> {
        self.records.get_mut(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (RecordId, &R)> + '_ {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    pub(crate) fn into_records(self) -> Vec<R> {
        self.records.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = RecordStore::new();
        let a = store.push("a");
        let b = store.push("b");
        assert_eq!(store.remove(b), Some("b"));
        let c = store.push("c");
        assert_ne!(b, c);
        assert!(store.get(b).is_none());
        assert_eq!(store.iter().map(|(_, r)| *r).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(store.remove(a), Some("a"));
        assert_eq!(store.remove(a), None);
        assert_eq!(store.into_records(), vec!["c"]);
    }
}

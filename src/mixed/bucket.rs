use crate::types::RecordId;

/// Records sharing one (key, value) pair, in insertion order.
///
/// Owned by its key slot's table. A bucket that becomes empty is dropped by
/// the slot, never left behind in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    ids: Vec<RecordId>,
}

impl Bucket {
    #[inline]
    pub(crate) fn new() -> Self {
        Self { ids: Vec::new() }
    }

    #[inline]
    pub(crate) fn push(&mut self, id: RecordId) {
        self.ids.push(id);
    }

    /// Remove the first occurrence of `id`. Returns false if it wasn't here.
    pub(crate) fn remove(&mut self, id: RecordId) -> bool {
        match self.ids.iter().position(|&x| x == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<RecordId> {
        self.ids.first().copied()
    }

    #[inline]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    #[inline]
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }
}

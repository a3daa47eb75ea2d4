mod bucket;
mod change_op;
mod index;
mod key_slot;
mod store;

pub use bucket::Bucket;
pub use change_op::Change;
pub use index::MixedIndex;
pub use key_slot::KeySlot;

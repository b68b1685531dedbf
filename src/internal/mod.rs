//! Internal implementation details.

pub(crate) mod map;
pub(crate) mod sync;

pub(crate) use sync::RwLock;

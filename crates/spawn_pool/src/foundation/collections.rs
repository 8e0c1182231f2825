//! Handle types backed by slot maps

pub use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable identifier of a pool inside a [`PoolRegistry`](crate::registry::PoolRegistry)
    pub struct PoolId;

    /// Stable identifier of an object owned by a [`MemoryHost`](crate::host::MemoryHost)
    pub struct ObjectKey;
}

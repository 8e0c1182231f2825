//! Pooled instances and the handles returned to callers

use crate::foundation::collections::PoolId;

/// Lifecycle state of a pooled instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// In use by the application
    Active,
    /// Deactivated and waiting on the free list
    Available,
}

/// Bookkeeping for one object owned by a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledInstance<O> {
    /// Host object
    pub object: O,
    /// Position in the pool's owned list, fixed for the instance's life
    pub ordinal: u32,
    /// Current state
    pub state: InstanceState,
}

impl<O> PooledInstance<O> {
    /// Whether the instance is in use
    pub fn is_active(&self) -> bool {
        self.state == InstanceState::Active
    }
}

/// Handle to a spawned instance
///
/// Carries a back-reference to the owning pool so despawning never has to
/// parse display names. Two handles are equal exactly when they refer to the
/// same instance of the same pool generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawned<O> {
    /// Owning pool
    pub pool: PoolId,
    /// Ordinal within the pool
    pub ordinal: u32,
    /// Pool generation the handle was issued in
    pub generation: u32,
    /// Host object
    pub object: O,
}

//! Template name → pool lookup table
//!
//! At most one pool exists per template name. Pools live in a slot map so
//! [`Spawned`](crate::pool::Spawned) handles can refer back to their owner by
//! [`PoolId`] without borrowing it; a removed pool's id is never handed out
//! again.

use crate::foundation::collections::{PoolId, SlotMap};
use crate::host::SpawnHost;
use crate::pool::{SpawnerPool, Template};
use std::collections::HashMap;

/// Registry of pools keyed by template name
pub struct PoolRegistry<H: SpawnHost> {
    pools: SlotMap<PoolId, SpawnerPool<H>>,
    names: HashMap<String, PoolId>,
    capacity_hint: usize,
}

impl<H: SpawnHost> PoolRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_capacity_hint(0)
    }

    /// Create an empty registry whose pools pre-allocate `capacity_hint` slots
    pub fn with_capacity_hint(capacity_hint: usize) -> Self {
        Self {
            pools: SlotMap::with_key(),
            names: HashMap::new(),
            capacity_hint,
        }
    }

    /// Create a pool for `template` under `name`
    ///
    /// Always creates a new pool. An existing pool registered under the same
    /// name is dropped along with its bookkeeping.
    pub fn create(&mut self, name: impl Into<String>, template: Template<H::Prototype>) -> PoolId {
        let name = name.into();
        let capacity = self.capacity_hint;
        let id = self.pools.insert_with_key(|id| SpawnerPool::new(id, template, capacity));

        if let Some(previous) = self.names.insert(name.clone(), id) {
            log::warn!("Replacing existing pool '{}'", name);
            self.pools.remove(previous);
        }

        log::info!("Registered pool '{}'", name);
        id
    }

    /// Remove the pool registered under `name`, if any
    pub fn remove(&mut self, name: &str) -> Option<SpawnerPool<H>> {
        let id = self.names.remove(name)?;
        log::info!("Removed pool '{}'", name);
        self.pools.remove(id)
    }

    /// Remove every pool
    pub fn remove_all(&mut self) {
        log::info!("Removing all {} pools", self.pools.len());
        self.names.clear();
        self.pools.clear();
    }

    /// Id of the pool registered under `name`
    pub fn id_of(&self, name: &str) -> Option<PoolId> {
        self.names.get(name).copied()
    }

    /// Pool registered under `name`
    pub fn get(&self, name: &str) -> Option<&SpawnerPool<H>> {
        self.id_of(name).and_then(|id| self.pools.get(id))
    }

    /// Mutable pool registered under `name`
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SpawnerPool<H>> {
        let id = self.id_of(name)?;
        self.pools.get_mut(id)
    }

    /// Pool with the given id
    pub fn pool(&self, id: PoolId) -> Option<&SpawnerPool<H>> {
        self.pools.get(id)
    }

    /// Mutable pool with the given id
    pub fn pool_mut(&mut self, id: PoolId) -> Option<&mut SpawnerPool<H>> {
        self.pools.get_mut(id)
    }

    /// Iterate over all pools
    pub fn pools(&self) -> impl Iterator<Item = &SpawnerPool<H>> {
        self.pools.values()
    }

    /// Iterate mutably over all pools
    pub fn pools_mut(&mut self) -> impl Iterator<Item = &mut SpawnerPool<H>> {
        self.pools.values_mut()
    }

    /// Registered template names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Number of pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether no pool is registered
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl<H: SpawnHost> Default for PoolRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Pose;
    use crate::host::{MemoryHost, NodePrototype};

    fn template(name: &str) -> Template<NodePrototype> {
        Template::new(name, NodePrototype::new(name))
    }

    #[test]
    fn test_create_and_get() {
        let mut registry: PoolRegistry<MemoryHost> = PoolRegistry::new();
        let id = registry.create("Enemy", template("Enemy"));

        assert_eq!(registry.id_of("Enemy"), Some(id));
        assert_eq!(registry.get("Enemy").map(SpawnerPool::id), Some(id));
        assert!(registry.get("Bullet").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_overwrites_existing() {
        let mut host = MemoryHost::new();
        let mut registry: PoolRegistry<MemoryHost> = PoolRegistry::new();
        let first = registry.create("Enemy", template("Enemy"));
        registry
            .get_mut("Enemy")
            .expect("pool")
            .spawn(&mut host, &Pose::identity())
            .expect("spawn");

        let second = registry.create("Enemy", template("Enemy"));

        assert_ne!(first, second);
        assert_eq!(registry.len(), 1);
        assert!(registry.pool(first).is_none());
        assert_eq!(registry.get("Enemy").map(SpawnerPool::len), Some(0));
    }

    #[test]
    fn test_remove() {
        let mut registry: PoolRegistry<MemoryHost> = PoolRegistry::new();
        let id = registry.create("Enemy", template("Enemy"));
        registry.create("Bullet", template("Bullet"));

        assert!(registry.remove("Missing").is_none());
        assert!(registry.remove("Enemy").is_some());
        assert!(registry.pool(id).is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Bullet"]);

        registry.remove_all();
        assert!(registry.is_empty());
        assert!(registry.get("Bullet").is_none());
    }
}

//! Spawner facade
//!
//! Single entry point for spawning pooled objects. The spawner owns the host,
//! the [`PoolRegistry`] and the [`SpawnerConfig`]; applications construct one
//! at startup and pass it to whatever needs to spawn.
//!
//! # Architecture
//!
//! ```text
//! Application → Spawner → PoolRegistry → SpawnerPool → SpawnHost
//!      |           |            |              |             |
//!  create_spawn  lookup or   name → pool    free list    instantiate
//!   despawn      create pool                 reuse       set_active
//! ```
//!
//! # Usage
//!
//! ```rust
//! use spawn_pool::prelude::*;
//!
//! let mut spawner = Spawner::new(MemoryHost::new());
//! let enemy = Template::new("Enemy", NodePrototype::new("enemy"));
//!
//! let spawned = spawner.create_spawn(&enemy, &Pose::identity())?;
//! assert_eq!(spawner.host().name(spawned.object).as_deref(), Some("Enemy (0)"));
//!
//! spawner.despawn(&spawned)?;
//! let again = spawner.create_spawn(&enemy, &Pose::identity())?;
//! assert_eq!(again, spawned);
//! # Ok::<(), SpawnError>(())
//! ```

use crate::config::{SpawnerConfig, UnmanagedDespawnPolicy};
use crate::error::{SpawnError, SpawnResult};
use crate::foundation::collections::PoolId;
use crate::foundation::math::Pose;
use crate::host::SpawnHost;
use crate::pool::{template_name_of, Spawned, SpawnerPool, Template};
use crate::registry::PoolRegistry;
use std::collections::HashSet;

/// What a despawn call did with the object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnOutcome {
    /// Returned to its pool's free list
    Released,
    /// Was already on its pool's free list
    AlreadyAvailable,
    /// Not pool-managed; destroyed through the host
    Destroyed,
    /// Not pool-managed; deactivated and left alive
    Deactivated,
}

/// Statistics across every pool of a spawner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnerStats {
    /// Registered pools
    pub pools: usize,
    /// Instances owned by all pools
    pub instances: usize,
    /// Instances currently active
    pub active: usize,
    /// Instances waiting for reuse
    pub available: usize,
    /// Instances created through the host
    pub created: u64,
    /// Spawns satisfied from a free list
    pub reused: u64,
    /// Instances returned to a free list
    pub despawned: u64,
    /// Unmanaged objects destroyed on despawn
    pub unmanaged_destroyed: u64,
    /// Unmanaged objects deactivated on despawn
    pub unmanaged_deactivated: u64,
}

impl SpawnerStats {
    /// Fraction of spawns served without creating a new object (0.0 to 1.0)
    pub fn reuse_ratio(&self) -> f32 {
        let total = self.created + self.reused;
        if total == 0 {
            0.0
        } else {
            self.reused as f32 / total as f32
        }
    }
}

/// Spawns and despawns pooled objects on a host engine
pub struct Spawner<H: SpawnHost> {
    host: H,
    registry: PoolRegistry<H>,
    config: SpawnerConfig,
    /// Objects left behind by cleared or removed pools
    abandoned: HashSet<H::Object>,
    unmanaged_destroyed: u64,
    unmanaged_deactivated: u64,
    shut_down: bool,
}

impl<H: SpawnHost> Spawner<H> {
    /// Create a spawner with the default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, SpawnerConfig::default())
    }

    /// Create a spawner with the given configuration
    pub fn with_config(host: H, config: SpawnerConfig) -> Self {
        log::info!(
            "Creating spawner (unmanaged despawn: {:?}, {} prespawn entries)",
            config.unmanaged_despawn,
            config.prespawn.len()
        );

        Self {
            host,
            registry: PoolRegistry::with_capacity_hint(config.initial_capacity),
            config,
            abandoned: HashSet::new(),
            unmanaged_destroyed: 0,
            unmanaged_deactivated: 0,
            shut_down: false,
        }
    }

    /// Host engine
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host engine
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active configuration
    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Pool registry
    pub fn registry(&self) -> &PoolRegistry<H> {
        &self.registry
    }

    /// Whether [`Spawner::shutdown`] has been called
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Spawn an instance of `template` at `pose`
    pub fn create_spawn(&mut self, template: &Template<H::Prototype>, pose: &Pose) -> SpawnResult<Spawned<H::Object>> {
        self.create_spawn_with(template, pose, |_, _| {})
    }

    /// Spawn an instance of `template` at `pose`, then run `on_spawned`
    ///
    /// The callback runs synchronously after the object is active.
    pub fn create_spawn_with<F>(
        &mut self,
        template: &Template<H::Prototype>,
        pose: &Pose,
        on_spawned: F,
    ) -> SpawnResult<Spawned<H::Object>>
    where
        F: FnOnce(&mut H, &Spawned<H::Object>),
    {
        let id = self.pool_for(template)?;
        Self::pool_by_id(&mut self.registry, id)?.spawn_with(&mut self.host, pose, on_spawned)
    }

    /// Make sure `count` instances of `template` are ready for reuse
    pub fn prespawn(&mut self, template: &Template<H::Prototype>, count: usize) -> SpawnResult<()> {
        let id = self.pool_for(template)?;
        Self::pool_by_id(&mut self.registry, id)?.prespawn(&mut self.host, count)
    }

    /// Despawn an instance through its pool back-reference
    ///
    /// If the owning pool has been removed or cleared since the handle was
    /// issued, the object is treated as unmanaged.
    pub fn despawn(&mut self, spawned: &Spawned<H::Object>) -> SpawnResult<DespawnOutcome> {
        self.ensure_running()?;

        let Some(pool) = self.registry.pool_mut(spawned.pool) else {
            return self.despawn_unmanaged(spawned.object);
        };

        match pool.despawn(&mut self.host, spawned) {
            Ok(released) => Ok(Self::outcome(released)),
            Err(SpawnError::StaleInstance { .. }) => self.despawn_unmanaged(spawned.object),
            Err(err) => Err(err),
        }
    }

    /// Despawn a host object by its display name
    ///
    /// The template name is recovered from the `"{Template} ({ordinal})"`
    /// convention. Objects whose name resolves to no registered pool, and
    /// objects abandoned by a cleared or removed pool, are handled by the
    /// unmanaged despawn policy; objects whose pool exists but never owned
    /// them are an error.
    pub fn despawn_object(&mut self, object: H::Object) -> SpawnResult<DespawnOutcome> {
        self.ensure_running()?;

        if self.abandoned.contains(&object) {
            return self.despawn_unmanaged(object);
        }

        let id = self
            .host
            .name(object)
            .as_deref()
            .and_then(template_name_of)
            .and_then(|name| self.registry.id_of(name));

        match id.and_then(|id| self.registry.pool_mut(id)) {
            Some(pool) => pool.despawn_object(&mut self.host, object).map(Self::outcome),
            None => self.despawn_unmanaged(object),
        }
    }

    /// Despawn a batch of instances, stopping at the first error
    ///
    /// Returns how many were returned to a free list.
    pub fn despawn_list(&mut self, list: &[Spawned<H::Object>]) -> SpawnResult<usize> {
        let mut released = 0;
        for spawned in list {
            if self.despawn(spawned)? == DespawnOutcome::Released {
                released += 1;
            }
        }
        Ok(released)
    }

    /// Despawn every instance of the pool registered under `name`
    pub fn despawn_all(&mut self, name: &str) -> SpawnResult<usize> {
        self.ensure_running()?;
        let pool = Self::pool_named(&mut self.registry, name)?;
        Ok(pool.despawn_all(&mut self.host))
    }

    /// Clear the pool registered under `name`, returning the abandoned objects
    pub fn clear_pool(&mut self, name: &str) -> SpawnResult<Vec<H::Object>> {
        self.ensure_running()?;
        let pool = Self::pool_named(&mut self.registry, name)?;
        let abandoned = pool.clear_pool(&mut self.host);
        self.abandoned.extend(abandoned.iter().copied());
        Ok(abandoned)
    }

    /// Active instances of the pool registered under `name`
    pub fn active_spawns(&self, name: &str) -> Option<Vec<Spawned<H::Object>>> {
        self.registry.get(name).map(SpawnerPool::active_spawns)
    }

    /// Pool registered under `name`
    pub fn pool(&self, name: &str) -> Option<&SpawnerPool<H>> {
        self.registry.get(name)
    }

    /// Stop tracking the pool registered under `name`
    ///
    /// Its objects stay in the host; despawning them later goes through the
    /// unmanaged policy.
    pub fn remove_pool(&mut self, name: &str) -> Option<SpawnerPool<H>> {
        let pool = self.registry.remove(name)?;
        self.abandoned.extend(pool.objects());
        Some(pool)
    }

    /// Stop tracking every pool
    pub fn remove_all_pools(&mut self) {
        for pool in self.registry.pools() {
            self.abandoned.extend(pool.objects());
        }
        self.registry.remove_all();
    }

    /// Statistics across all pools
    pub fn stats(&self) -> SpawnerStats {
        let mut stats = SpawnerStats {
            pools: self.registry.len(),
            unmanaged_destroyed: self.unmanaged_destroyed,
            unmanaged_deactivated: self.unmanaged_deactivated,
            ..Default::default()
        };

        for pool in self.registry.pools() {
            let pool_stats = pool.stats();
            stats.instances += pool.len();
            stats.active += pool_stats.active;
            stats.available += pool_stats.available;
            stats.created += pool_stats.created;
            stats.reused += pool_stats.reused;
            stats.despawned += pool_stats.despawned;
        }

        stats
    }

    /// Clear every pool, destroy all pooled objects and refuse further work
    ///
    /// Returns the number of objects destroyed. Calling it again is a no-op.
    pub fn shutdown(&mut self) -> usize {
        if self.shut_down {
            return 0;
        }

        let mut destroyed = 0;
        for pool in self.registry.pools_mut() {
            for object in pool.clear_pool(&mut self.host) {
                self.host.destroy(object);
                destroyed += 1;
            }
        }
        self.registry.remove_all();
        self.abandoned.clear();
        self.shut_down = true;

        log::info!("Spawner shut down ({} pooled objects destroyed)", destroyed);
        destroyed
    }

    /// Consume the spawner and return the host
    pub fn into_host(self) -> H {
        self.host
    }

    /// Find or create the pool for `template`, warming new pools per config
    ///
    /// A new pool whose warm-up fails is unregistered again, so the next call
    /// retries the warm-up from scratch.
    fn pool_for(&mut self, template: &Template<H::Prototype>) -> SpawnResult<PoolId> {
        self.ensure_running()?;

        if let Some(id) = self.registry.id_of(template.name()) {
            return Ok(id);
        }

        let id = self.registry.create(template.name(), template.clone());
        let warm = self.config.prespawn_count(template.name());
        if warm > 0 {
            let warmed = Self::pool_by_id(&mut self.registry, id)?.prespawn(&mut self.host, warm);
            if let Err(err) = warmed {
                log::warn!("Warm-up of pool '{}' failed: {}", template.name(), err);
                self.remove_pool(template.name());
                return Err(err);
            }
        }

        Ok(id)
    }

    fn pool_by_id(registry: &mut PoolRegistry<H>, id: PoolId) -> SpawnResult<&mut SpawnerPool<H>> {
        // Only reachable with ids fresh from the registry
        registry.pool_mut(id).ok_or_else(|| SpawnError::PoolNotFound {
            name: format!("{:?}", id),
        })
    }

    fn pool_named<'a>(registry: &'a mut PoolRegistry<H>, name: &str) -> SpawnResult<&'a mut SpawnerPool<H>> {
        registry
            .get_mut(name)
            .ok_or_else(|| SpawnError::PoolNotFound { name: name.to_string() })
    }

    fn despawn_unmanaged(&mut self, object: H::Object) -> SpawnResult<DespawnOutcome> {
        match self.config.unmanaged_despawn {
            UnmanagedDespawnPolicy::Destroy => {
                log::warn!("Destroying unmanaged object {:?}", object);
                self.abandoned.remove(&object);
                self.host.destroy(object);
                self.unmanaged_destroyed += 1;
                Ok(DespawnOutcome::Destroyed)
            }
            UnmanagedDespawnPolicy::Deactivate => {
                log::warn!("Deactivating unmanaged object {:?}", object);
                self.host.set_active(object, false);
                self.unmanaged_deactivated += 1;
                Ok(DespawnOutcome::Deactivated)
            }
            UnmanagedDespawnPolicy::Reject => Err(SpawnError::UnmanagedInstance {
                object: format!("{:?}", object),
            }),
        }
    }

    fn ensure_running(&self) -> SpawnResult<()> {
        if self.shut_down {
            Err(SpawnError::ShutDown)
        } else {
            Ok(())
        }
    }

    fn outcome(released: bool) -> DespawnOutcome {
        if released {
            DespawnOutcome::Released
        } else {
            DespawnOutcome::AlreadyAvailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::host::{MemoryHost, NodePrototype};

    fn enemy() -> Template<NodePrototype> {
        Template::new("Enemy", NodePrototype::new("enemy"))
    }

    #[test]
    fn test_create_spawn_registers_pool_once() {
        let mut spawner = Spawner::new(MemoryHost::new());

        let a = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        let b = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        assert_eq!(a.pool, b.pool);
        assert_eq!(spawner.registry().len(), 1);
        assert_eq!(spawner.host().name(b.object).as_deref(), Some("Enemy (1)"));
    }

    #[test]
    fn test_create_spawn_with_callback() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let target = Pose::from_position(Vec3::new(0.0, 3.0, 0.0));

        let spawned = spawner
            .create_spawn_with(&enemy(), &Pose::identity(), |host, spawned| {
                host.set_pose(spawned.object, &target);
            })
            .expect("spawn");

        assert_eq!(spawner.host().get(spawned.object).map(|o| o.pose), Some(target));
    }

    #[test]
    fn test_despawn_object_by_name() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let spawned = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        assert_eq!(spawner.despawn_object(spawned.object), Ok(DespawnOutcome::Released));
        assert_eq!(spawner.despawn_object(spawned.object), Ok(DespawnOutcome::AlreadyAvailable));
        assert_eq!(spawner.pool("Enemy").map(SpawnerPool::available_count), Some(1));
    }

    #[test]
    fn test_despawn_unmanaged_object_destroys_it() {
        let mut spawner = Spawner::new(MemoryHost::new());
        spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        let stray = spawner.host_mut().insert("Rock (7)", Pose::identity());

        assert_eq!(spawner.despawn_object(stray), Ok(DespawnOutcome::Destroyed));
        assert!(!spawner.host().contains(stray));
        assert_eq!(spawner.stats().unmanaged_destroyed, 1);
    }

    #[test]
    fn test_despawn_unmanaged_policies() {
        let config = SpawnerConfig::default().with_unmanaged_despawn(UnmanagedDespawnPolicy::Deactivate);
        let mut spawner = Spawner::with_config(MemoryHost::new(), config);
        let stray = spawner.host_mut().insert("Stray", Pose::identity());

        assert_eq!(spawner.despawn_object(stray), Ok(DespawnOutcome::Deactivated));
        assert!(spawner.host().contains(stray));
        assert!(!spawner.host().is_active(stray));

        let config = SpawnerConfig::default().with_unmanaged_despawn(UnmanagedDespawnPolicy::Reject);
        let mut spawner = Spawner::with_config(MemoryHost::new(), config);
        let stray = spawner.host_mut().insert("Stray", Pose::identity());

        assert!(matches!(spawner.despawn_object(stray), Err(SpawnError::UnmanagedInstance { .. })));
        assert!(spawner.host().is_active(stray));
    }

    #[test]
    fn test_despawn_object_with_pool_name_but_not_owned() {
        let mut spawner = Spawner::new(MemoryHost::new());
        spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        let impostor = spawner.host_mut().insert("Enemy (0)", Pose::identity());

        assert!(matches!(spawner.despawn_object(impostor), Err(SpawnError::ForeignInstance { .. })));
        assert!(spawner.host().contains(impostor));
    }

    #[test]
    fn test_despawn_after_pool_removed_falls_back() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let spawned = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        assert!(spawner.remove_pool("Enemy").is_some());
        assert_eq!(spawner.despawn(&spawned), Ok(DespawnOutcome::Destroyed));
        assert!(!spawner.host().contains(spawned.object));
    }

    #[test]
    fn test_despawn_after_clear_falls_back() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let spawned = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        let abandoned = spawner.clear_pool("Enemy").expect("clear");
        assert_eq!(abandoned, vec![spawned.object]);
        assert_eq!(spawner.despawn(&spawned), Ok(DespawnOutcome::Destroyed));
    }

    #[test]
    fn test_despawn_object_after_clear_falls_back() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let a = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        let b = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        spawner.clear_pool("Enemy").expect("clear");

        assert_eq!(spawner.despawn(&a), Ok(DespawnOutcome::Destroyed));
        assert_eq!(spawner.despawn_object(b.object), Ok(DespawnOutcome::Destroyed));
        assert!(!spawner.host().contains(a.object));
        assert!(!spawner.host().contains(b.object));
        assert_eq!(spawner.stats().unmanaged_destroyed, 2);
    }

    #[test]
    fn test_despawn_object_after_pool_recreated_falls_back() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let old = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        assert!(spawner.remove_pool("Enemy").is_some());
        let fresh = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        assert_eq!(spawner.host().name(fresh.object).as_deref(), Some("Enemy (0)"));

        assert_eq!(spawner.despawn_object(old.object), Ok(DespawnOutcome::Destroyed));
        assert!(!spawner.host().contains(old.object));
        assert_eq!(spawner.despawn_object(fresh.object), Ok(DespawnOutcome::Released));
    }

    #[test]
    fn test_despawn_list_counts_released() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let stale = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        spawner.clear_pool("Enemy").expect("clear");

        let a = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        let b = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        spawner.despawn(&b).expect("despawn");

        assert_eq!(spawner.despawn_list(&[a, b, stale]), Ok(1));
        assert_eq!(spawner.despawn_list(&[]), Ok(0));
        assert!(!spawner.host().contains(stale.object));
        assert_eq!(spawner.pool("Enemy").map(SpawnerPool::available_count), Some(2));
    }

    #[test]
    fn test_failed_warm_up_unregisters_pool() {
        let config = SpawnerConfig::default().with_prespawn("Enemy", 3);
        let mut spawner = Spawner::with_config(MemoryHost::new(), config);
        spawner.host_mut().set_refuse_instantiation(true);

        let result = spawner.create_spawn(&enemy(), &Pose::identity());
        assert!(matches!(result, Err(SpawnError::Host { .. })));
        assert!(spawner.registry().is_empty());

        spawner.host_mut().set_refuse_instantiation(false);
        spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        let stats = spawner.stats();
        assert_eq!(stats.created, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.available, 2);
    }

    #[test]
    fn test_named_operations_on_missing_pool() {
        let mut spawner: Spawner<MemoryHost> = Spawner::new(MemoryHost::new());

        assert!(matches!(spawner.despawn_all("Ghost"), Err(SpawnError::PoolNotFound { .. })));
        assert!(matches!(spawner.clear_pool("Ghost"), Err(SpawnError::PoolNotFound { .. })));
        assert!(spawner.active_spawns("Ghost").is_none());
        assert!(spawner.remove_pool("Ghost").is_none());
    }

    #[test]
    fn test_configured_prespawn_on_first_use() {
        let config = SpawnerConfig::default().with_prespawn("Enemy", 4);
        let mut spawner = Spawner::with_config(MemoryHost::new(), config);

        spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        let stats = spawner.stats();
        assert_eq!(stats.created, 4);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.available, 3);
    }

    #[test]
    fn test_stats() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let bullet = Template::new("Bullet", NodePrototype::new("bullet"));

        let a = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        spawner.create_spawn(&bullet, &Pose::identity()).expect("spawn");
        spawner.despawn(&a).expect("despawn");
        spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");

        let stats = spawner.stats();
        assert_eq!(stats.pools, 2);
        assert_eq!(stats.instances, 2);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.created, 2);
        assert_eq!(stats.reused, 1);
        assert!((stats.reuse_ratio() - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(SpawnerStats::default().reuse_ratio(), 0.0);
    }

    #[test]
    fn test_shutdown() {
        let mut spawner = Spawner::new(MemoryHost::new());
        let spawned = spawner.create_spawn(&enemy(), &Pose::identity()).expect("spawn");
        spawner.prespawn(&enemy(), 3).expect("prespawn");

        assert_eq!(spawner.shutdown(), 4);
        assert_eq!(spawner.shutdown(), 0);
        assert!(spawner.is_shut_down());
        assert!(spawner.registry().is_empty());
        assert!(spawner.host().is_empty());

        assert_eq!(spawner.create_spawn(&enemy(), &Pose::identity()), Err(SpawnError::ShutDown));
        assert_eq!(spawner.despawn(&spawned), Err(SpawnError::ShutDown));
        assert_eq!(spawner.prespawn(&enemy(), 1), Err(SpawnError::ShutDown));
    }
}

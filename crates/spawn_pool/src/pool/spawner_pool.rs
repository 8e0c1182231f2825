//! Single-template object pool
//!
//! Owns every instance created from one [`Template`] plus a LIFO free list of
//! the ones currently deactivated. Instances are created on demand when the
//! free list is empty and are never destroyed by the pool itself; clearing
//! the pool hands the abandoned objects back to the caller.
//!
//! # Invariants
//!
//! - Every ordinal on the free list refers to an instance in state
//!   [`InstanceState::Available`]; every other owned instance is
//!   [`InstanceState::Active`].
//! - An instance keeps its ordinal and display name across reuse cycles.
//! - Handles issued before [`SpawnerPool::clear_pool`] are rejected afterwards.

use super::instance::{InstanceState, PooledInstance, Spawned};
use super::naming::instance_name;
use super::template::Template;
use crate::error::{SpawnError, SpawnResult};
use crate::foundation::collections::PoolId;
use crate::foundation::math::Pose;
use crate::host::SpawnHost;
use std::collections::HashMap;

/// Counters for one pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances created through the host
    pub created: u64,
    /// Spawns satisfied from the free list
    pub reused: u64,
    /// Active → Available transitions
    pub despawned: u64,
    /// Instances currently active
    pub active: usize,
    /// Instances currently on the free list
    pub available: usize,
}

/// Pool of interchangeable instances of one template
pub struct SpawnerPool<H: SpawnHost> {
    id: PoolId,
    template: Template<H::Prototype>,
    /// All instances ever created, indexed by ordinal
    instances: Vec<PooledInstance<H::Object>>,
    /// Free list of ordinals, most recently despawned last
    available: Vec<u32>,
    lookup: HashMap<H::Object, u32>,
    generation: u32,
    created: u64,
    reused: u64,
    despawned: u64,
}

impl<H: SpawnHost> SpawnerPool<H> {
    /// Create an empty pool for `template`
    pub fn new(id: PoolId, template: Template<H::Prototype>, capacity: usize) -> Self {
        log::debug!("Creating pool '{}' with capacity hint {}", template.name(), capacity);

        Self {
            id,
            template,
            instances: Vec::with_capacity(capacity),
            available: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
            generation: 0,
            created: 0,
            reused: 0,
            despawned: 0,
        }
    }

    /// Registry identifier of this pool
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Template name
    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Template this pool instantiates
    pub fn template(&self) -> &Template<H::Prototype> {
        &self.template
    }

    /// Incremented every time the pool is cleared
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Spawn an instance at `pose`
    pub fn spawn(&mut self, host: &mut H, pose: &Pose) -> SpawnResult<Spawned<H::Object>> {
        self.spawn_with(host, pose, |_, _| {})
    }

    /// Spawn an instance at `pose` and run `on_spawned` once it is active
    ///
    /// Reuses the most recently despawned instance if there is one, otherwise
    /// asks the host for a new object named `"{Template} ({ordinal})"`.
    pub fn spawn_with<F>(&mut self, host: &mut H, pose: &Pose, on_spawned: F) -> SpawnResult<Spawned<H::Object>>
    where
        F: FnOnce(&mut H, &Spawned<H::Object>),
    {
        if !pose.is_finite() {
            return Err(SpawnError::InvalidPose {
                template: self.name().to_string(),
                reason: format!("non-finite values in {:?}", pose),
            });
        }

        let ordinal = if let Some(ordinal) = self.available.pop() {
            let instance = &mut self.instances[ordinal as usize];
            host.set_pose(instance.object, pose);
            instance.state = InstanceState::Active;
            self.reused += 1;
            log::trace!("Reusing '{}' instance {}", self.template.name(), ordinal);
            ordinal
        } else {
            let object = host
                .instantiate(self.template.prototype(), pose)
                .map_err(|source| SpawnError::Host {
                    template: self.template.name().to_string(),
                    source,
                })?;

            let ordinal = self.instances.len() as u32;
            host.set_name(object, &instance_name(self.template.name(), ordinal));

            self.instances.push(PooledInstance {
                object,
                ordinal,
                state: InstanceState::Active,
            });
            self.lookup.insert(object, ordinal);
            self.created += 1;
            log::trace!("Created '{}' instance {}", self.template.name(), ordinal);
            ordinal
        };

        let spawned = self.handle(ordinal);
        host.set_active(spawned.object, true);
        on_spawned(host, &spawned);

        Ok(spawned)
    }

    /// Make sure at least `count` instances are waiting on the free list
    ///
    /// Spawns `count` instances at the origin and despawns them again. If the
    /// host fails part way, the instances spawned so far are still despawned
    /// before the error is returned.
    pub fn prespawn(&mut self, host: &mut H, count: usize) -> SpawnResult<()> {
        let mut warmed = Vec::with_capacity(count);
        let mut failure = None;

        for _ in 0..count {
            match self.spawn(host, &Pose::identity()) {
                Ok(spawned) => warmed.push(spawned),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        for spawned in &warmed {
            self.despawn(host, spawned)?;
        }

        log::debug!("Prespawned {} '{}' instances", warmed.len(), self.template.name());
        failure.map_or(Ok(()), Err)
    }

    /// Return an instance to the free list
    ///
    /// Returns `Ok(false)` if the instance was already available.
    pub fn despawn(&mut self, host: &mut H, spawned: &Spawned<H::Object>) -> SpawnResult<bool> {
        if spawned.pool != self.id {
            return Err(self.foreign(spawned.object));
        }

        if spawned.generation != self.generation {
            return Err(SpawnError::StaleInstance {
                pool: self.name().to_string(),
                object: format!("{:?}", spawned.object),
                generation: spawned.generation,
                current: self.generation,
            });
        }

        let owned = self
            .instances
            .get(spawned.ordinal as usize)
            .is_some_and(|instance| instance.object == spawned.object);
        if !owned {
            return Err(self.foreign(spawned.object));
        }

        Ok(self.release(host, spawned.ordinal))
    }

    /// Return an instance to the free list, addressed by its host object
    pub fn despawn_object(&mut self, host: &mut H, object: H::Object) -> SpawnResult<bool> {
        match self.lookup.get(&object) {
            Some(&ordinal) => Ok(self.release(host, ordinal)),
            None => Err(self.foreign(object)),
        }
    }

    /// Despawn every instance in `list`, stopping at the first error
    ///
    /// Returns how many instances actually changed state.
    pub fn despawn_list(&mut self, host: &mut H, list: &[Spawned<H::Object>]) -> SpawnResult<usize> {
        let mut released = 0;
        for spawned in list {
            if self.despawn(host, spawned)? {
                released += 1;
            }
        }
        Ok(released)
    }

    /// Despawn every instance owned by this pool
    pub fn despawn_all(&mut self, host: &mut H) -> usize {
        let mut released = 0;
        for ordinal in 0..self.instances.len() as u32 {
            if self.release(host, ordinal) {
                released += 1;
            }
        }
        released
    }

    /// Despawn everything and forget all instances
    ///
    /// The pool no longer tracks the returned objects; destroying them is up
    /// to the caller. Later spawns create fresh instances starting again at
    /// ordinal 0.
    pub fn clear_pool(&mut self, host: &mut H) -> Vec<H::Object> {
        self.despawn_all(host);

        let abandoned: Vec<_> = self.instances.drain(..).map(|instance| instance.object).collect();
        self.available.clear();
        self.lookup.clear();
        self.generation = self.generation.wrapping_add(1);

        log::debug!("Cleared pool '{}' ({} instances abandoned)", self.template.name(), abandoned.len());
        abandoned
    }

    /// Handles to every active instance, in creation order
    pub fn active_spawns(&self) -> Vec<Spawned<H::Object>> {
        self.instances
            .iter()
            .filter(|instance| instance.is_active())
            .map(|instance| self.handle(instance.ordinal))
            .collect()
    }

    /// Current state of the instance behind a handle
    pub fn state_of(&self, spawned: &Spawned<H::Object>) -> Option<InstanceState> {
        if spawned.pool != self.id || spawned.generation != self.generation {
            return None;
        }
        self.instances
            .get(spawned.ordinal as usize)
            .filter(|instance| instance.object == spawned.object)
            .map(|instance| instance.state)
    }

    /// Bookkeeping for the instance with the given ordinal
    pub fn instance(&self, ordinal: u32) -> Option<&PooledInstance<H::Object>> {
        self.instances.get(ordinal as usize)
    }

    /// Whether this pool owns `object`
    pub fn contains_object(&self, object: H::Object) -> bool {
        self.lookup.contains_key(&object)
    }

    /// Host objects of every owned instance, in creation order
    pub fn objects(&self) -> impl Iterator<Item = H::Object> + '_ {
        self.instances.iter().map(|instance| instance.object)
    }

    /// Number of instances owned
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the pool owns no instances
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of active instances
    pub fn active_count(&self) -> usize {
        self.instances.len() - self.available.len()
    }

    /// Number of instances waiting for reuse
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created,
            reused: self.reused,
            despawned: self.despawned,
            active: self.active_count(),
            available: self.available_count(),
        }
    }

    fn handle(&self, ordinal: u32) -> Spawned<H::Object> {
        Spawned {
            pool: self.id,
            ordinal,
            generation: self.generation,
            object: self.instances[ordinal as usize].object,
        }
    }

    /// Active → Available; `false` if already available
    fn release(&mut self, host: &mut H, ordinal: u32) -> bool {
        let instance = &mut self.instances[ordinal as usize];
        if instance.state == InstanceState::Available {
            return false;
        }

        instance.state = InstanceState::Available;
        host.set_active(instance.object, false);
        self.available.push(ordinal);
        self.despawned += 1;
        log::trace!("Despawned '{}' instance {}", self.template.name(), ordinal);
        true
    }

    fn foreign(&self, object: H::Object) -> SpawnError {
        SpawnError::ForeignInstance {
            pool: self.name().to_string(),
            object: format!("{:?}", object),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = std::collections::HashSet::new();
        for &ordinal in &self.available {
            assert!(seen.insert(ordinal), "ordinal {} listed twice", ordinal);
            assert_eq!(self.instances[ordinal as usize].state, InstanceState::Available);
        }
        for instance in &self.instances {
            if !seen.contains(&instance.ordinal) {
                assert_eq!(instance.state, InstanceState::Active);
            }
        }
        assert_eq!(self.lookup.len(), self.instances.len());
    }
}

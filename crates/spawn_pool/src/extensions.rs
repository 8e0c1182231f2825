//! Extension traits for spawning straight from templates and handles
//!
//! ```rust
//! use spawn_pool::prelude::*;
//!
//! let mut spawner = Spawner::new(MemoryHost::new());
//! let bullet = Template::new("Bullet", NodePrototype::new("bullet"));
//!
//! bullet.prespawn(&mut spawner, 8)?;
//! let shot = bullet.spawn(&mut spawner, &Pose::identity())?;
//! shot.despawn(&mut spawner)?;
//! # Ok::<(), SpawnError>(())
//! ```

use crate::error::SpawnResult;
use crate::foundation::math::Pose;
use crate::host::SpawnHost;
use crate::pool::{Spawned, Template};
use crate::spawner::{DespawnOutcome, Spawner};

/// Spawning helpers on [`Template`]
pub trait SpawnExt<H: SpawnHost> {
    /// Spawn through `spawner`'s pool for this template
    fn spawn(&self, spawner: &mut Spawner<H>, pose: &Pose) -> SpawnResult<Spawned<H::Object>>;

    /// Spawn and run `on_spawned` once the instance is active
    fn spawn_with<F>(&self, spawner: &mut Spawner<H>, pose: &Pose, on_spawned: F) -> SpawnResult<Spawned<H::Object>>
    where
        F: FnOnce(&mut H, &Spawned<H::Object>);

    /// Warm the pool for this template with `count` instances
    fn prespawn(&self, spawner: &mut Spawner<H>, count: usize) -> SpawnResult<()>;
}

impl<H: SpawnHost> SpawnExt<H> for Template<H::Prototype> {
    fn spawn(&self, spawner: &mut Spawner<H>, pose: &Pose) -> SpawnResult<Spawned<H::Object>> {
        spawner.create_spawn(self, pose)
    }

    fn spawn_with<F>(&self, spawner: &mut Spawner<H>, pose: &Pose, on_spawned: F) -> SpawnResult<Spawned<H::Object>>
    where
        F: FnOnce(&mut H, &Spawned<H::Object>),
    {
        spawner.create_spawn_with(self, pose, on_spawned)
    }

    fn prespawn(&self, spawner: &mut Spawner<H>, count: usize) -> SpawnResult<()> {
        spawner.prespawn(self, count)
    }
}

/// Despawning helper on [`Spawned`]
pub trait DespawnExt<H: SpawnHost> {
    /// Despawn through `spawner`; unmanaged objects follow its policy
    fn despawn(&self, spawner: &mut Spawner<H>) -> SpawnResult<DespawnOutcome>;
}

impl<H: SpawnHost> DespawnExt<H> for Spawned<H::Object> {
    fn despawn(&self, spawner: &mut Spawner<H>) -> SpawnResult<DespawnOutcome> {
        spawner.despawn(self)
    }
}

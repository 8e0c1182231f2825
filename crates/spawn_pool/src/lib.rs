//! # Spawn Pool
//!
//! Engine-agnostic object pooling for spawned game objects.
//!
//! ## Features
//!
//! - **Per-template pools**: instances are reused LIFO, created only when the free list is empty
//! - **Host abstraction**: the engine is reached only through [`SpawnHost`](host::SpawnHost)
//! - **Back-referencing handles**: [`Spawned`](pool::Spawned) knows its pool, no name parsing needed
//! - **Name convention**: instances are named `"{Template} ({ordinal})"` for despawn-by-object
//! - **Configurable**: prespawn tables and unmanaged despawn policy from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use spawn_pool::prelude::*;
//!
//! let mut spawner = Spawner::new(MemoryHost::new());
//! let enemy = Template::new("Enemy", NodePrototype::new("enemy"));
//!
//! spawner.prespawn(&enemy, 4)?;
//! let spawned = spawner.create_spawn(&enemy, &Pose::from_position(Vec3::new(0.0, 1.0, 0.0)))?;
//! spawner.despawn(&spawned)?;
//! # Ok::<(), SpawnError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_possible_truncation)]

pub mod foundation;
pub mod config;
pub mod host;
pub mod pool;
pub mod registry;
pub mod spawner;
pub mod extensions;

mod error;

#[cfg(test)]
mod tests;

pub use error::{SpawnError, SpawnResult};

/// Common imports for spawner users
pub mod prelude {
    pub use crate::{
        SpawnError, SpawnResult,
        foundation::math::{Vec3, Quat, Pose},
        config::{Config, SpawnerConfig, UnmanagedDespawnPolicy},
        host::{SpawnHost, HostError, MemoryHost, NodePrototype},
        pool::{Template, Spawned, InstanceState, SpawnerPool},
        registry::PoolRegistry,
        spawner::{Spawner, SpawnerStats, DespawnOutcome},
        extensions::{SpawnExt, DespawnExt},
    };
}

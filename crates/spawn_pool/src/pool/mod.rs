//! Per-template object pools
//!
//! A [`SpawnerPool`] owns every instance ever created from one [`Template`]
//! and keeps the inactive ones on a LIFO free list for reuse.
//!
//! ```text
//! spawn()   → pop free list ─┬─ hit  → set pose → activate → Spawned
//!                            └─ miss → host.instantiate → name "{Template} ({n})"
//! despawn() → deactivate → push free list
//! ```

pub mod instance;
pub mod naming;
pub mod spawner_pool;
pub mod template;

pub use instance::{InstanceState, PooledInstance, Spawned};
pub use naming::{instance_name, template_name_of};
pub use spawner_pool::{PoolStats, SpawnerPool};
pub use template::Template;

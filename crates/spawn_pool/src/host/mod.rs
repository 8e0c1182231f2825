//! Host engine capability interface
//!
//! Pools never touch engine types directly. Everything they need from the
//! engine (creating objects, naming them, moving them, toggling them and
//! destroying them) goes through [`SpawnHost`].

pub mod memory;

pub use memory::{MemoryHost, NodePrototype, SceneObject};

use crate::foundation::math::Pose;
use std::fmt::Debug;
use std::hash::Hash;

/// Error reported by a host engine
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct HostError {
    /// Description of the failure
    pub reason: String,
}

impl HostError {
    /// Create a new host error
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Capabilities a host engine exposes to the pooling system
pub trait SpawnHost {
    /// Engine-side handle of a live object
    type Object: Copy + Eq + Hash + Debug;

    /// Prototype a template instantiates from
    type Prototype: Clone;

    /// Create a new object from `prototype` placed at `pose`
    fn instantiate(&mut self, prototype: &Self::Prototype, pose: &Pose) -> Result<Self::Object, HostError>;

    /// Set the display name of an object
    fn set_name(&mut self, object: Self::Object, name: &str);

    /// Display name of an object, `None` if the host does not know it
    fn name(&self, object: Self::Object) -> Option<String>;

    /// Move and reorient an object
    fn set_pose(&mut self, object: Self::Object, pose: &Pose);

    /// Enable or disable an object
    fn set_active(&mut self, object: Self::Object, active: bool);

    /// Whether an object is enabled
    fn is_active(&self, object: Self::Object) -> bool;

    /// Destroy an object
    fn destroy(&mut self, object: Self::Object);
}

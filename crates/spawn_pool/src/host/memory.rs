//! In-memory scene host
//!
//! A [`SpawnHost`] that keeps objects in a slot map. Headless servers, tools
//! and tests use it where no real engine is available.

use super::{HostError, SpawnHost};
use crate::foundation::collections::{ObjectKey, SlotMap};
use crate::foundation::math::Pose;

/// Prototype for objects created by a [`MemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePrototype {
    /// Free-form tag copied onto every instance
    pub tag: String,
}

impl NodePrototype {
    /// Create a prototype with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

/// An object living in a [`MemoryHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Display name
    pub name: String,
    /// Tag copied from the prototype
    pub tag: String,
    /// Current pose
    pub pose: Pose,
    /// Whether the object is enabled
    pub active: bool,
}

/// Slot-map backed scene
#[derive(Debug, Default)]
pub struct MemoryHost {
    objects: SlotMap<ObjectKey, SceneObject>,
    instantiated: u64,
    destroyed: u64,
    refuse_instantiation: bool,
}

impl MemoryHost {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object that was not created by any pool
    pub fn insert(&mut self, name: impl Into<String>, pose: Pose) -> ObjectKey {
        self.objects.insert(SceneObject {
            name: name.into(),
            tag: String::new(),
            pose,
            active: true,
        })
    }

    /// Look up an object
    pub fn get(&self, object: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(object)
    }

    /// Whether the object still exists
    pub fn contains(&self, object: ObjectKey) -> bool {
        self.objects.contains_key(object)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of live objects that are enabled
    pub fn active_len(&self) -> usize {
        self.objects.values().filter(|o| o.active).count()
    }

    /// Total objects instantiated from prototypes
    pub fn instantiated(&self) -> u64 {
        self.instantiated
    }

    /// Total objects destroyed
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Make every following `instantiate` call fail
    pub fn set_refuse_instantiation(&mut self, refuse: bool) {
        self.refuse_instantiation = refuse;
    }
}

impl SpawnHost for MemoryHost {
    type Object = ObjectKey;
    type Prototype = NodePrototype;

    fn instantiate(&mut self, prototype: &NodePrototype, pose: &Pose) -> Result<ObjectKey, HostError> {
        if self.refuse_instantiation {
            return Err(HostError::new(format!("instantiation of '{}' refused", prototype.tag)));
        }

        self.instantiated += 1;
        Ok(self.objects.insert(SceneObject {
            name: prototype.tag.clone(),
            tag: prototype.tag.clone(),
            pose: *pose,
            active: true,
        }))
    }

    fn set_name(&mut self, object: ObjectKey, name: &str) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.name = name.to_string();
        }
    }

    fn name(&self, object: ObjectKey) -> Option<String> {
        self.objects.get(object).map(|o| o.name.clone())
    }

    fn set_pose(&mut self, object: ObjectKey, pose: &Pose) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.pose = *pose;
        }
    }

    fn set_active(&mut self, object: ObjectKey, active: bool) {
        if let Some(obj) = self.objects.get_mut(object) {
            obj.active = active;
        }
    }

    fn is_active(&self, object: ObjectKey) -> bool {
        self.objects.get(object).is_some_and(|o| o.active)
    }

    fn destroy(&mut self, object: ObjectKey) {
        if self.objects.remove(object).is_some() {
            self.destroyed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_instantiate_and_destroy() {
        let mut host = MemoryHost::new();
        let pose = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));

        let object = host.instantiate(&NodePrototype::new("Enemy"), &pose).expect("instantiate");
        assert!(host.is_active(object));
        assert_eq!(host.name(object).as_deref(), Some("Enemy"));
        assert_eq!(host.get(object).map(|o| o.pose), Some(pose));

        host.destroy(object);
        host.destroy(object);
        assert!(!host.contains(object));
        assert_eq!(host.instantiated(), 1);
        assert_eq!(host.destroyed(), 1);
    }

    #[test]
    fn test_refused_instantiation() {
        let mut host = MemoryHost::new();
        host.set_refuse_instantiation(true);

        let result = host.instantiate(&NodePrototype::new("Enemy"), &Pose::identity());
        assert!(result.is_err());
        assert!(host.is_empty());
    }
}

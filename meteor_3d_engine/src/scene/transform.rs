/// Entity transforms and the caller-owned transform store.
///
/// Components never own their position/rotation/scale; they hold an
/// [`EntityKey`] into a [`TransformStore`] the caller owns, and the
/// subsystems read (or, for physics, write) through that key once per
/// frame. Keys stay valid while the entity lives, regardless of store
/// growth.

use glam::{Mat4, Vec3};
use slotmap::{new_key_type, SlotMap};

use crate::utils::deg_to_rad;

new_key_type! {
    /// Stable key of one entity's transform in a [`TransformStore`]
    pub struct EntityKey;
}

/// Position, rotation (degrees) and scale of one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees, applied X then Y then Z
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Origin, no rotation, unit scale
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Identity transform at `position`
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Compose the model matrix: translate · rotate-X · rotate-Y ·
    /// rotate-Z · scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(deg_to_rad(self.rotation.x))
            * Mat4::from_rotation_y(deg_to_rad(self.rotation.y))
            * Mat4::from_rotation_z(deg_to_rad(self.rotation.z))
            * Mat4::from_scale(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The entity table: caller-owned storage every component reads through
pub struct TransformStore {
    transforms: SlotMap<EntityKey, Transform>,
}

impl TransformStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            transforms: SlotMap::with_key(),
        }
    }

    /// Add an entity, returning its stable key
    pub fn insert(&mut self, transform: Transform) -> EntityKey {
        self.transforms.insert(transform)
    }

    /// Remove an entity.
    ///
    /// The caller must destroy every component referencing the key first;
    /// subsystems log a warning when they meet a dead key.
    pub fn remove(&mut self, key: EntityKey) -> Option<Transform> {
        self.transforms.remove(key)
    }

    pub fn get(&self, key: EntityKey) -> Option<&Transform> {
        self.transforms.get(key)
    }

    pub fn get_mut(&mut self, key: EntityKey) -> Option<&mut Transform> {
        self.transforms.get_mut(key)
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        self.transforms.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Default for TransformStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;

/// Physics scene - axis-aligned collision detection and resolution.
///
/// Components live in parallel attribute arrays indexed by recycled
/// slots; positions are read and written through the caller's transform
/// store. Colliders are axis-aligned boxes given as half-extents around
/// the entity position.

use bitflags::bitflags;
use glam::Vec3;

use crate::error::{Error, Result};
use crate::scene::{EntityKey, TransformStore};
use crate::utils::SlotAllocator;

/// Full-pair resolution passes per `resolve_collisions` call.
///
/// More passes reduce residual penetration in stacks; with elasticity
/// at most 1 they never add energy.
pub const COLLISION_RESOLVE_ITERATIONS: usize = 4;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct ComponentFlags: u8 {
        const ACTIVE = 1 << 0;
        const STATIC = 1 << 1;
    }
}

/// Handle of one physics component; recycled after destroy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsComponent(u32);

/// Global simulation parameters shared by every component
#[derive(Debug, Clone, Copy)]
pub struct PhysicsSettings {
    /// Per-tick velocity damping factor in `[0, 1]`
    pub drag: f32,
    /// Acceleration applied on the y axis, per second
    pub gravity: f32,
    /// Restitution coefficient in `[0, 1]`
    pub elasticity: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            drag: 0.0,
            gravity: -9.81,
            elasticity: 0.5,
        }
    }
}

/// The collision world: parallel component arrays over a free list
pub struct PhysicsScene {
    settings: PhysicsSettings,
    slots: SlotAllocator,
    entities: Vec<EntityKey>,
    velocities: Vec<Vec3>,
    half_extents: Vec<Vec3>,
    masses: Vec<f32>,
    flags: Vec<ComponentFlags>,
}

impl PhysicsScene {
    /// Create an empty scene with the given global parameters
    pub fn new(settings: PhysicsSettings) -> Self {
        crate::engine_info!(
            "meteor3d::Physics",
            "Physics scene created (drag {}, gravity {}, elasticity {})",
            settings.drag,
            settings.gravity,
            settings.elasticity
        );

        Self {
            settings,
            slots: SlotAllocator::new(),
            entities: Vec::new(),
            velocities: Vec::new(),
            half_extents: Vec::new(),
            masses: Vec::new(),
            flags: Vec::new(),
        }
    }

    pub fn settings(&self) -> PhysicsSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: PhysicsSettings) {
        self.settings = settings;
    }

    /// Add a component over `entity`'s position.
    ///
    /// `half_extents` is the collider's half size per axis; `mass` must be
    /// positive unless the component is static. Freed slots are recycled,
    /// so the returned handle may equal a previously destroyed one.
    pub fn create_component(
        &mut self,
        entity: EntityKey,
        half_extents: Vec3,
        mass: f32,
        is_static: bool,
    ) -> PhysicsComponent {
        debug_assert!(is_static || mass > 0.0, "dynamic bodies need positive mass");

        let slot = self.slots.allocate() as usize;

        if slot == self.entities.len() {
            self.entities.push(entity);
            self.velocities.push(Vec3::ZERO);
            self.half_extents.push(half_extents);
            self.masses.push(mass);
            self.flags.push(ComponentFlags::empty());
        } else {
            self.entities[slot] = entity;
            self.velocities[slot] = Vec3::ZERO;
            self.half_extents[slot] = half_extents;
            self.masses[slot] = mass;
        }

        let mut flags = ComponentFlags::ACTIVE;
        flags.set(ComponentFlags::STATIC, is_static);
        self.flags[slot] = flags;

        PhysicsComponent(slot as u32)
    }

    /// Free a component's slot for recycling
    pub fn destroy_component(&mut self, component: PhysicsComponent) -> Result<()> {
        let slot = self.check(component)?;

        self.flags[slot] = ComponentFlags::empty();
        self.velocities[slot] = Vec3::ZERO;
        self.half_extents[slot] = Vec3::ZERO;
        self.masses[slot] = 0.0;
        self.slots.release(component.0);

        Ok(())
    }

    /// Number of live components
    pub fn len(&self) -> usize {
        self.slots.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn velocity(&self, component: PhysicsComponent) -> Result<Vec3> {
        Ok(self.velocities[self.check(component)?])
    }

    pub fn set_velocity(&mut self, component: PhysicsComponent, velocity: Vec3) -> Result<()> {
        let slot = self.check(component)?;
        self.velocities[slot] = velocity;
        Ok(())
    }

    pub fn half_extents(&self, component: PhysicsComponent) -> Result<Vec3> {
        Ok(self.half_extents[self.check(component)?])
    }

    pub fn set_half_extents(&mut self, component: PhysicsComponent, half: Vec3) -> Result<()> {
        let slot = self.check(component)?;
        self.half_extents[slot] = half;
        Ok(())
    }

    pub fn mass(&self, component: PhysicsComponent) -> Result<f32> {
        Ok(self.masses[self.check(component)?])
    }

    pub fn set_mass(&mut self, component: PhysicsComponent, mass: f32) -> Result<()> {
        let slot = self.check(component)?;
        self.masses[slot] = mass;
        Ok(())
    }

    pub fn is_static(&self, component: PhysicsComponent) -> Result<bool> {
        Ok(self.flags[self.check(component)?].contains(ComponentFlags::STATIC))
    }

    pub fn set_static(&mut self, component: PhysicsComponent, is_static: bool) -> Result<()> {
        let slot = self.check(component)?;
        self.flags[slot].set(ComponentFlags::STATIC, is_static);
        Ok(())
    }

    /// Integrate every non-static component.
    ///
    /// Gravity accelerates y, then the velocity is damped by the constant
    /// per-tick factor `1 - drag` (note this is per update call, not per
    /// second), then the position advances through the store.
    pub fn update(&mut self, dt: f32, transforms: &mut TransformStore) {
        for slot in 0..self.flags.len() {
            let flags = self.flags[slot];
            if !flags.contains(ComponentFlags::ACTIVE) || flags.contains(ComponentFlags::STATIC) {
                continue;
            }

            self.velocities[slot].y += self.settings.gravity * dt;
            self.velocities[slot] *= 1.0 - self.settings.drag;

            match transforms.get_mut(self.entities[slot]) {
                Some(transform) => transform.position += self.velocities[slot] * dt,
                None => {
                    crate::engine_warn!(
                        "meteor3d::Physics",
                        "Component entity is gone from the transform store"
                    );
                }
            }
        }
    }

    /// Per-axis overlap of two components' boxes.
    ///
    /// All three components positive means the boxes intersect. The
    /// computation is symmetric in its arguments.
    pub fn overlap(
        &self,
        first: PhysicsComponent,
        second: PhysicsComponent,
        transforms: &TransformStore,
    ) -> Result<Vec3> {
        let a = self.check(first)?;
        let b = self.check(second)?;

        let position_a = self.position_of(a, transforms);
        let position_b = self.position_of(b, transforms);

        let min_a = position_a - self.half_extents[a];
        let max_a = position_a + self.half_extents[a];
        let min_b = position_b - self.half_extents[b];
        let max_b = position_b + self.half_extents[b];

        Ok(max_a.min(max_b) - min_a.max(min_b))
    }

    /// Whether two components' boxes intersect
    pub fn is_colliding(
        &self,
        first: PhysicsComponent,
        second: PhysicsComponent,
        transforms: &TransformStore,
    ) -> Result<bool> {
        let overlap = self.overlap(first, second, transforms)?;
        Ok(overlap.x > 0.0 && overlap.y > 0.0 && overlap.z > 0.0)
    }

    /// Run the fixed number of resolution passes over every live pair.
    ///
    /// Each colliding pair is separated along its minimum-overlap axis
    /// (ties go x before y before z) and its velocities exchanged with
    /// the scene's restitution.
    pub fn resolve_collisions(&mut self, transforms: &mut TransformStore) {
        for _ in 0..COLLISION_RESOLVE_ITERATIONS {
            for first in 0..self.flags.len() {
                if !self.flags[first].contains(ComponentFlags::ACTIVE) {
                    continue;
                }

                for second in (first + 1)..self.flags.len() {
                    if !self.flags[second].contains(ComponentFlags::ACTIVE) {
                        continue;
                    }

                    self.resolve_pair(first, second, transforms);
                }
            }
        }
    }

    fn resolve_pair(&mut self, first: usize, second: usize, transforms: &mut TransformStore) {
        let position_a = self.position_of(first, transforms);
        let position_b = self.position_of(second, transforms);

        let min_a = position_a - self.half_extents[first];
        let max_a = position_a + self.half_extents[first];
        let min_b = position_b - self.half_extents[second];
        let max_b = position_b + self.half_extents[second];

        let overlap = max_a.min(max_b) - min_a.max(min_b);

        if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
            return;
        }

        let axis = separation_axis(overlap);

        let first_static = self.flags[first].contains(ComponentFlags::STATIC);
        let second_static = self.flags[second].contains(ComponentFlags::STATIC);

        match (first_static, second_static) {
            (true, true) => {}
            (true, false) => self.resolve_static_vs_dynamic(first, second, overlap, axis, transforms),
            (false, true) => self.resolve_static_vs_dynamic(second, first, overlap, axis, transforms),
            (false, false) => self.resolve_dynamic_vs_dynamic(first, second, overlap, axis, transforms),
        }
    }

    /// Move the dynamic body out by the full overlap and reflect its
    /// velocity on the separation axis with the restitution coefficient.
    fn resolve_static_vs_dynamic(
        &mut self,
        static_slot: usize,
        dynamic_slot: usize,
        overlap: Vec3,
        axis: usize,
        transforms: &mut TransformStore,
    ) {
        let static_position = self.position_of(static_slot, transforms)[axis];
        let dynamic_position = self.position_of(dynamic_slot, transforms)[axis];

        let push = if dynamic_position < static_position {
            -overlap[axis]
        } else {
            overlap[axis]
        };

        if let Some(transform) = transforms.get_mut(self.entities[dynamic_slot]) {
            transform.position[axis] += push;
        }

        self.velocities[dynamic_slot][axis] *= -self.settings.elasticity;
    }

    /// Split the positional correction in inverse-mass proportion, then
    /// apply the 1-D elastic exchange with restitution on the axis:
    ///
    /// `v_a' = ((m_a − e·m_b)·v_a + (1+e)·m_b·v_b) / (m_a + m_b)`
    /// `v_b' = ((m_b − e·m_a)·v_b + (1+e)·m_a·v_a) / (m_a + m_b)`
    fn resolve_dynamic_vs_dynamic(
        &mut self,
        first: usize,
        second: usize,
        overlap: Vec3,
        axis: usize,
        transforms: &mut TransformStore,
    ) {
        let mass_a = self.masses[first];
        let mass_b = self.masses[second];
        let total_inverse_mass = 1.0 / mass_a + 1.0 / mass_b;

        let move_a = (1.0 / mass_a) / total_inverse_mass * overlap[axis];
        let move_b = (1.0 / mass_b) / total_inverse_mass * overlap[axis];

        let position_a = self.position_of(first, transforms)[axis];
        let position_b = self.position_of(second, transforms)[axis];

        let (push_a, push_b) = if position_a < position_b {
            (-move_a, move_b)
        } else {
            (move_a, -move_b)
        };

        if let Some(transform) = transforms.get_mut(self.entities[first]) {
            transform.position[axis] += push_a;
        }
        if let Some(transform) = transforms.get_mut(self.entities[second]) {
            transform.position[axis] += push_b;
        }

        let elasticity = self.settings.elasticity;
        let velocity_a = self.velocities[first][axis];
        let velocity_b = self.velocities[second][axis];
        let inverse_mass_sum = 1.0 / (mass_a + mass_b);

        self.velocities[first][axis] = ((mass_a - elasticity * mass_b) * velocity_a
            + (1.0 + elasticity) * mass_b * velocity_b)
            * inverse_mass_sum;

        self.velocities[second][axis] = ((mass_b - elasticity * mass_a) * velocity_b
            + (1.0 + elasticity) * mass_a * velocity_a)
            * inverse_mass_sum;
    }

    fn position_of(&self, slot: usize, transforms: &TransformStore) -> Vec3 {
        transforms
            .get(self.entities[slot])
            .map(|transform| transform.position)
            .unwrap_or(Vec3::ZERO)
    }

    fn check(&self, component: PhysicsComponent) -> Result<usize> {
        if !self.slots.is_live(component.0) {
            return Err(crate::engine_err!(
                "meteor3d::Physics",
                Error::InvalidHandle(format!(
                    "physics component {} is dead or out of range",
                    component.0
                ))
            ));
        }
        Ok(component.0 as usize)
    }
}

/// Index of the minimum-overlap axis; ties resolve x, then y, then z
fn separation_axis(overlap: Vec3) -> usize {
    if overlap.x <= overlap.y && overlap.x <= overlap.z {
        0
    } else if overlap.y <= overlap.z {
        1
    } else {
        2
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "physics_scene_tests.rs"]
mod tests;

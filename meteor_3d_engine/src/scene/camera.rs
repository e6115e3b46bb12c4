/// Camera - view/projection math over a referenced transform.
///
/// The camera borrows its position and rotation from an entity in the
/// caller's transform store; both matrices are recomputed every
/// `Scene::update`, never cached across frames.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::scene::{EntityKey, Transform, TransformStore};
use crate::utils::{cos_deg, deg_to_rad, normalized_or_zero, sin_deg};

/// Divisor turning `window_px * size` into orthographic half-extents
pub const ORTHOGRAPHIC_SIZE_MULTIPLIER: f32 = 1000.0;

const DEFAULT_FOV: f32 = 90.0;
const DEFAULT_NEAR_CLIP_PLANE: f32 = 0.01;
const DEFAULT_FAR_CLIP_PLANE: f32 = 1000.0;

/// Projection kind and its size parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertical field of view in degrees
    Perspective { fov_degrees: f32 },
    /// Orthographic size, scaled by the window size over
    /// [`ORTHOGRAPHIC_SIZE_MULTIPLIER`]
    Orthographic { size: f32 },
}

/// The scene's point of view
pub struct Camera {
    entity: EntityKey,
    projection: Projection,
    near_clip_plane: f32,
    far_clip_plane: f32,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    // Transform snapshot taken during update, read back during render
    position: Vec3,
    rotation: Vec3,
}

impl Camera {
    /// Perspective camera with default fov and clip planes, looking
    /// through the given entity's transform
    pub fn new(entity: EntityKey) -> Self {
        Self {
            entity,
            projection: Projection::Perspective {
                fov_degrees: DEFAULT_FOV,
            },
            near_clip_plane: DEFAULT_NEAR_CLIP_PLANE,
            far_clip_plane: DEFAULT_FAR_CLIP_PLANE,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    /// Set projection and clip planes. `near` must be positive and `far`
    /// greater than `near`.
    pub fn configure(&mut self, projection: Projection, near: f32, far: f32) {
        debug_assert!(near > 0.0, "near clip plane must be positive");
        debug_assert!(far > near, "far clip plane must exceed the near plane");

        self.projection = projection;
        self.near_clip_plane = near;
        self.far_clip_plane = far;
    }

    pub fn entity(&self) -> EntityKey {
        self.entity
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn near_clip_plane(&self) -> f32 {
        self.near_clip_plane
    }

    pub fn far_clip_plane(&self) -> f32 {
        self.far_clip_plane
    }

    /// View matrix as of the last update
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix as of the last update
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Position snapshot taken by the last update
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation snapshot (degrees) taken by the last update
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Unit view direction for pitch/yaw given in degrees
    pub fn forward_for(rotation: Vec3) -> Vec3 {
        normalized_or_zero(Vec3::new(
            cos_deg(rotation.x) * cos_deg(rotation.y),
            sin_deg(rotation.x),
            cos_deg(rotation.x) * sin_deg(rotation.y),
        ))
    }

    /// Recompute both matrices from the referenced transform.
    ///
    /// Runs once per frame from `Scene::update`. A dead entity key keeps
    /// the previous pose and logs a warning.
    pub(crate) fn update(&mut self, transforms: &TransformStore, window_size: (u32, u32)) {
        match transforms.get(self.entity) {
            Some(transform) => {
                self.position = transform.position;
                self.rotation = transform.rotation;
            }
            None => {
                crate::engine_warn!(
                    "meteor3d::Camera",
                    "Camera entity is gone from the transform store"
                );
            }
        }

        let forward = Self::forward_for(self.rotation);
        self.view_matrix = Mat4::look_at_rh(self.position, self.position + forward, Vec3::Y);

        let width = window_size.0.max(1) as f32;
        let height = window_size.1.max(1) as f32;

        self.projection_matrix = match self.projection {
            Projection::Perspective { fov_degrees } => Mat4::perspective_rh_gl(
                deg_to_rad(fov_degrees),
                width / height,
                self.near_clip_plane,
                self.far_clip_plane,
            ),
            Projection::Orthographic { size } => {
                let half_x = width * size / ORTHOGRAPHIC_SIZE_MULTIPLIER;
                let half_y = height * size / ORTHOGRAPHIC_SIZE_MULTIPLIER;
                Mat4::orthographic_rh_gl(
                    -half_x,
                    half_x,
                    -half_y,
                    half_y,
                    self.near_clip_plane,
                    self.far_clip_plane,
                )
            }
        };
    }

    /// Project a screen pixel at clip-space depth back into world space.
    ///
    /// Inverse-transforms `(ndc_x, ndc_y, depth, 1)` through the current
    /// view and projection, then perspective-divides.
    pub fn screen_to_world(&self, screen: Vec2, depth: f32, window_size: (u32, u32)) -> Vec3 {
        let width = window_size.0.max(1) as f32;
        let height = window_size.1.max(1) as f32;

        let ndc_x = 2.0 * screen.x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / height;

        let inverse = (self.projection_matrix * self.view_matrix).inverse();
        let unprojected = inverse * glam::Vec4::new(ndc_x, ndc_y, depth, 1.0);

        unprojected.xyz() / unprojected.w
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;

/// Degree-based angle helpers.
///
/// Every public rotation in the engine is expressed in degrees; these
/// wrappers convert at the call site so the camera and transform paths
/// read the same as the formulas they implement.

use glam::Vec3;

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Convert radians to degrees
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}

/// Sine of an angle given in degrees
pub fn sin_deg(degrees: f32) -> f32 {
    deg_to_rad(degrees).sin()
}

/// Cosine of an angle given in degrees
pub fn cos_deg(degrees: f32) -> f32 {
    deg_to_rad(degrees).cos()
}

/// Tangent of an angle given in degrees
pub fn tan_deg(degrees: f32) -> f32 {
    deg_to_rad(degrees).tan()
}

/// Four-quadrant arctangent, returned in degrees
pub fn atan2_deg(y: f32, x: f32) -> f32 {
    rad_to_deg(y.atan2(x))
}

/// Linear interpolation `a + t * (b - a)`, not clamped
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Normalize a vector; the zero vector stays zero
pub fn normalized_or_zero(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(Vec3::ZERO)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "angles_tests.rs"]
mod tests;

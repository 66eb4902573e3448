//! Render-distance culling
//!
//! The test is an axis-aligned box around the camera, not a radius: each
//! axis is compared independently. 3D adds the Z axis. The same test gates
//! which copies are drawn and, through the current-copies list, which
//! copies the collision engine can see.

use crate::core::config::Dimension;
use crate::foundation::math::Vec3;

/// Whether `point` lies strictly inside the box of half-size `distance`
/// centered on `camera`
#[must_use]
pub fn within_render_distance(point: &Vec3, camera: &Vec3, distance: f32, dimension: Dimension) -> bool {
    let planar = (point.x - camera.x).abs() < distance && (point.y - camera.y).abs() < distance;
    match dimension {
        Dimension::TwoD => planar,
        Dimension::ThreeD => planar && (point.z - camera.z).abs() < distance,
    }
}

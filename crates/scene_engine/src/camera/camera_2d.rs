//! Orthographic pixel-space camera

use crate::camera::CameraMovement;
use crate::core::config::{CameraConfig, MovementPolicy};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// 2D camera
///
/// The position is held in normalized device coordinates and the view
/// matrix translates in NDC, so backends apply the view after the
/// pixel-to-NDC projection (`view * projection * model`). Consumers that
/// work in pixels (collision, mouse transforms) read the position through
/// [`Camera2D::position`], which maps it back to pixel space.
#[derive(Debug, Clone)]
pub struct Camera2D {
    position: Vec3,
    screen: (f32, f32),
    front: Vec3,
    up: Vec3,
    speed: f32,
    movement: MovementPolicy,
    view: Mat4,
}

impl Camera2D {
    /// Camera centered on the screen
    #[must_use]
    pub fn new(screen: (f32, f32), config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::zeros(),
            screen,
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            speed: config.speed,
            movement: config.movement,
            view: Mat4::identity(),
        };
        if let Some([x, y, z]) = config.start_position {
            camera.set_position(Vec3::new(x, y, z));
        }
        camera.look();
        camera
    }

    /// Position in pixels
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(
            (self.position.x / 2.0) * self.screen.0 + self.screen.0 / 2.0,
            (self.position.y / 2.0) * self.screen.1 + self.screen.1 / 2.0,
            self.position.z,
        )
    }

    /// Move to a pixel position
    pub fn set_position(&mut self, pixels: Vec3) {
        self.position = Vec3::new(
            (pixels.x - self.screen.0 / 2.0) * 2.0 / self.screen.0,
            (pixels.y - self.screen.1 / 2.0) * 2.0 / self.screen.1,
            pixels.z,
        );
    }

    /// Position in normalized device coordinates
    #[must_use]
    pub const fn ndc_position(&self) -> Vec3 {
        self.position
    }

    /// Screen size in pixels
    #[must_use]
    pub const fn screen_size(&self) -> (f32, f32) {
        self.screen
    }

    /// Translate along the flagged axes
    ///
    /// Each flag moves the camera by `speed` NDC units, or by
    /// `speed * delta_time` with [`MovementPolicy::TimeScaled`].
    pub fn apply_movement(&mut self, movement: CameraMovement, delta_time: f32) {
        let step = match self.movement {
            MovementPolicy::FixedStep => self.speed,
            MovementPolicy::TimeScaled => self.speed * delta_time,
        };
        let right = self.front.cross(&self.up).normalize();

        if movement.contains(CameraMovement::UP) {
            self.position += self.up * step;
        }
        if movement.contains(CameraMovement::DOWN) {
            self.position -= self.up * step;
        }
        if movement.contains(CameraMovement::FORWARD) {
            self.position += self.front * step;
        }
        if movement.contains(CameraMovement::BACKWARD) {
            self.position -= self.front * step;
        }
        if movement.contains(CameraMovement::RIGHT) {
            self.position += right * step;
        }
        if movement.contains(CameraMovement::LEFT) {
            self.position -= right * step;
        }
    }

    /// Recompute the view matrix
    pub fn look(&mut self) {
        self.view = Mat4::look_at(self.position, self.position + self.front, self.up);
    }

    /// Current view matrix
    #[must_use]
    pub const fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Pixel-to-NDC orthographic projection
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic(0.0, self.screen.0, 0.0, self.screen.1, -1.0, 1.0)
    }

    /// Update the screen size; the pixel position is preserved
    pub fn set_screen_size(&mut self, screen: (f32, f32)) {
        let pixels = self.position();
        self.screen = screen;
        self.set_position(pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera2D {
        Camera2D::new((800.0, 600.0), &CameraConfig::default())
    }

    #[test]
    fn test_default_position_is_screen_center() {
        let camera = camera();
        assert_relative_eq!(camera.position(), Vec3::new(400.0, 300.0, 0.0));
        assert_relative_eq!(camera.ndc_position(), Vec3::zeros());
    }

    #[test]
    fn test_set_position_round_trips_through_ndc() {
        let mut camera = camera();
        camera.set_position(Vec3::new(1000.0, -50.0, 0.0));
        assert_relative_eq!(camera.ndc_position().x, 1.5);
        assert_relative_eq!(camera.position(), Vec3::new(1000.0, -50.0, 0.0), epsilon = 1e-3);
    }

    #[test]
    fn test_fixed_step_ignores_delta() {
        let mut camera = camera();
        camera.apply_movement(CameraMovement::RIGHT | CameraMovement::UP, 10.0);
        assert_relative_eq!(camera.ndc_position(), Vec3::new(0.05, 0.05, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_view_translates_opposite_to_camera() {
        let mut camera = camera();
        camera.set_position(Vec3::new(800.0, 300.0, 0.0));
        camera.look();
        let moved = camera.view().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_maps_screen_corners() {
        let camera = camera();
        let corner = camera.projection().transform_point(&nalgebra::Point3::new(800.0, 600.0, 0.0));
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-6);
    }
}

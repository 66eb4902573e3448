//! Perspective free-look camera

use crate::camera::CameraMovement;
use crate::core::config::{CameraConfig, MovementPolicy};
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec2, Vec3};
use crate::input::InputState;

const PITCH_LIMIT: f32 = 89.0;

/// 3D camera driven by yaw and pitch
///
/// # Coordinate System
/// Right-handed, Y-up. A yaw of -90° with zero pitch looks down -Z.
///
/// Mouse-look discards the first sample after creation or after
/// [`Camera3D::reset_mouse_baseline`], so the jump from wherever the cursor
/// was to its first reported position is never applied.
#[derive(Debug, Clone)]
pub struct Camera3D {
    position: Vec3,
    world_up: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    roll: f32,
    speed: f32,
    sensitivity: f32,
    smoothing: f32,
    smoothed_delta: Vec2,
    first_mouse: bool,
    movement: MovementPolicy,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
}

impl Camera3D {
    /// Create a camera at the configured start position (origin by default)
    #[must_use]
    pub fn new(screen: (f32, f32), config: &CameraConfig) -> Self {
        let position = config
            .start_position
            .map_or_else(Vec3::zeros, |[x, y, z]| Vec3::new(x, y, z));
        let mut camera = Self {
            position,
            world_up: Vec3::new(0.0, 1.0, 0.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            yaw: -90.0,
            pitch: 0.0,
            roll: 0.0,
            speed: config.speed,
            sensitivity: config.sensitivity,
            smoothing: utils::clamp(config.mouse_smoothing, f32::EPSILON, 1.0),
            smoothed_delta: Vec2::zeros(),
            first_mouse: true,
            movement: config.movement,
            fov_degrees: config.fov_degrees,
            aspect: screen.0 / screen.1,
            near: config.near,
            far: config.far,
            view: Mat4::identity(),
        };
        camera.update_vectors();
        camera.look();
        camera
    }

    /// World position
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Move to a world position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Normalized viewing direction
    #[must_use]
    pub const fn front(&self) -> Vec3 {
        self.front
    }

    /// Yaw in degrees
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Roll in degrees
    #[must_use]
    pub const fn roll(&self) -> f32 {
        self.roll
    }

    /// Set yaw in degrees
    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
        self.update_vectors();
    }

    /// Set pitch in degrees, clamped to ±89°
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = utils::clamp(degrees, -PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Set roll in degrees
    pub fn set_roll(&mut self, degrees: f32) {
        self.roll = degrees;
        self.update_vectors();
    }

    /// Treat the next mouse sample as a new baseline
    pub fn reset_mouse_baseline(&mut self) {
        self.first_mouse = true;
        self.smoothed_delta = Vec2::zeros();
    }

    /// Rotate from this frame's mouse delta
    pub fn mouse_look(&mut self, input: &InputState) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        let delta = input.mouse_delta();
        self.smoothed_delta = self.smoothed_delta.lerp(&delta, self.smoothing);

        self.yaw += self.smoothed_delta.x * self.sensitivity;
        // Screen Y grows downward
        self.pitch = utils::clamp(
            self.pitch - self.smoothed_delta.y * self.sensitivity,
            -PITCH_LIMIT,
            PITCH_LIMIT,
        );
        self.update_vectors();
    }

    /// Translate along the front and strafe axes
    pub fn apply_movement(&mut self, movement: CameraMovement, delta_time: f32) {
        let step = match self.movement {
            MovementPolicy::FixedStep => self.speed,
            MovementPolicy::TimeScaled => self.speed * delta_time,
        };
        let right = self.front.cross(&self.up).normalize();

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
        if movement.contains(CameraMovement::UP) {
            self.position += self.world_up * step;
        }
        if movement.contains(CameraMovement::DOWN) {
            self.position -= self.world_up * step;
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

    /// Perspective projection
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(utils::deg_to_rad(self.fov_degrees), self.aspect, self.near, self.far)
    }

    /// Update the aspect ratio from a new screen size
    pub fn set_screen_size(&mut self, screen: (f32, f32)) {
        let aspect = screen.0 / screen.1;
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    fn update_vectors(&mut self) {
        let yaw = utils::deg_to_rad(self.yaw);
        let pitch = utils::deg_to_rad(self.pitch);
        self.front = Vec3::new(pitch.cos() * yaw.cos(), pitch.sin(), pitch.cos() * yaw.sin()).normalize();

        let right = self.front.cross(&self.world_up).normalize();
        let up = right.cross(&self.front).normalize();
        let roll = utils::deg_to_rad(self.roll);
        self.up = (up * roll.cos() + right * roll.sin()).normalize();
    }
}

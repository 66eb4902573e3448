//! # Camera System
//!
//! Viewer position and orientation for both rendering dimensions.
//!
//! - [`Camera2D`]: orthographic, position held in NDC and reported in pixels
//! - [`Camera3D`]: perspective free-look with yaw/pitch mouse control
//!
//! [`Camera`] wraps either variant behind one surface so the frame scheduler
//! does not care which dimension it is rendering. Rotation mutators are
//! no-ops on the 2D variant.

pub mod camera_2d;
pub mod camera_3d;

pub use camera_2d::Camera2D;
pub use camera_3d::Camera3D;

use bitflags::bitflags;

use crate::core::config::{Dimension, EngineConfig};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::input::{InputState, KeyCode};

bitflags! {
    /// Movement directions requested for one camera step
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CameraMovement: u8 {
        /// Along the world up axis
        const UP = 1 << 0;
        /// Against the world up axis
        const DOWN = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Along the front axis
        const FORWARD = 1 << 4;
        /// Against the front axis
        const BACKWARD = 1 << 5;
    }
}

impl CameraMovement {
    /// Free-look key bindings: WASD or arrows move, Space rises, Left Shift
    /// sinks
    #[must_use]
    pub fn from_input(input: &InputState) -> Self {
        let bindings = [
            (KeyCode::W, Self::FORWARD),
            (KeyCode::Up, Self::FORWARD),
            (KeyCode::S, Self::BACKWARD),
            (KeyCode::Down, Self::BACKWARD),
            (KeyCode::A, Self::LEFT),
            (KeyCode::Left, Self::LEFT),
            (KeyCode::D, Self::RIGHT),
            (KeyCode::Right, Self::RIGHT),
            (KeyCode::Space, Self::UP),
            (KeyCode::LeftShift, Self::DOWN),
        ];
        Self::collect(input, &bindings)
    }

    /// Planar key bindings: W/S and Up/Down pan vertically, A/D and
    /// Left/Right pan horizontally
    #[must_use]
    pub fn from_input_2d(input: &InputState) -> Self {
        let bindings = [
            (KeyCode::W, Self::UP),
            (KeyCode::Up, Self::UP),
            (KeyCode::S, Self::DOWN),
            (KeyCode::Down, Self::DOWN),
            (KeyCode::A, Self::LEFT),
            (KeyCode::Left, Self::LEFT),
            (KeyCode::D, Self::RIGHT),
            (KeyCode::Right, Self::RIGHT),
        ];
        Self::collect(input, &bindings)
    }

    fn collect(input: &InputState, bindings: &[(KeyCode, Self)]) -> Self {
        bindings
            .iter()
            .filter(|(key, _)| input.is_key_down(*key))
            .fold(Self::empty(), |flags, (_, flag)| flags | *flag)
    }
}

/// Camera for either rendering dimension
#[derive(Debug, Clone)]
pub enum Camera {
    /// Orthographic pixel-space camera
    TwoD(Camera2D),
    /// Perspective free-look camera
    ThreeD(Camera3D),
}

/// Camera plus the behavior switches read from configuration
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// The camera
    pub camera: Camera,
    /// Whether keyboard movement is applied in [`CameraRig::process_input`]
    pub controls_enabled: bool,
    /// Whether mouse movement rotates a 3D camera
    pub mouse_look: bool,
}

impl Camera {
    /// Camera variant matching the configured dimension
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let screen = config.screen_size();
        match config.renderer.dimension {
            Dimension::TwoD => Self::TwoD(Camera2D::new(screen, &config.camera)),
            Dimension::ThreeD => Self::ThreeD(Camera3D::new(screen, &config.camera)),
        }
    }

    /// Dimension of this camera
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        match self {
            Self::TwoD(_) => Dimension::TwoD,
            Self::ThreeD(_) => Dimension::ThreeD,
        }
    }

    /// Recompute the view matrix
    pub fn look(&mut self) {
        match self {
            Self::TwoD(camera) => camera.look(),
            Self::ThreeD(camera) => camera.look(),
        }
    }

    /// Current view matrix
    #[must_use]
    pub const fn view(&self) -> &Mat4 {
        match self {
            Self::TwoD(camera) => camera.view(),
            Self::ThreeD(camera) => camera.view(),
        }
    }

    /// View used by screen-anchored content; ignores camera motion
    #[must_use]
    pub fn static_view() -> Mat4 {
        Mat4::look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0))
    }

    /// View matrix as 16 contiguous floats, column-major
    #[must_use]
    pub fn view_buffer(&self) -> [f32; 16] {
        self.view().to_column_buffer()
    }

    /// Projection matrix
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        match self {
            Self::TwoD(camera) => camera.projection(),
            Self::ThreeD(camera) => camera.projection(),
        }
    }

    /// Position; pixels in 2D, world units in 3D
    #[must_use]
    pub fn position(&self) -> Vec3 {
        match self {
            Self::TwoD(camera) => camera.position(),
            Self::ThreeD(camera) => camera.position(),
        }
    }

    /// Move the camera; pixels in 2D, world units in 3D
    pub fn set_position(&mut self, position: Vec3) {
        match self {
            Self::TwoD(camera) => camera.set_position(position),
            Self::ThreeD(camera) => camera.set_position(position),
        }
    }

    /// Set yaw in degrees; no-op in 2D
    pub fn set_yaw(&mut self, degrees: f32) {
        if let Self::ThreeD(camera) = self {
            camera.set_yaw(degrees);
        }
    }

    /// Set pitch in degrees; no-op in 2D
    pub fn set_pitch(&mut self, degrees: f32) {
        if let Self::ThreeD(camera) = self {
            camera.set_pitch(degrees);
        }
    }

    /// Set roll in degrees; no-op in 2D
    pub fn set_roll(&mut self, degrees: f32) {
        if let Self::ThreeD(camera) = self {
            camera.set_roll(degrees);
        }
    }

    /// Apply movement flags
    pub fn apply_movement(&mut self, movement: CameraMovement, delta_time: f32) {
        match self {
            Self::TwoD(camera) => camera.apply_movement(movement, delta_time),
            Self::ThreeD(camera) => camera.apply_movement(movement, delta_time),
        }
    }

    /// Rotate from the frame's mouse delta; no-op in 2D
    pub fn mouse_look(&mut self, input: &InputState) {
        if let Self::ThreeD(camera) = self {
            camera.mouse_look(input);
        }
    }

    /// Discard the next mouse sample; no-op in 2D
    pub fn reset_mouse_baseline(&mut self) {
        if let Self::ThreeD(camera) = self {
            camera.reset_mouse_baseline();
        }
    }

    /// Propagate a screen size change
    pub fn set_screen_size(&mut self, screen: (f32, f32)) {
        match self {
            Self::TwoD(camera) => camera.set_screen_size(screen),
            Self::ThreeD(camera) => camera.set_screen_size(screen),
        }
    }
}

impl CameraRig {
    /// Camera and switches from configuration
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            camera: Camera::from_config(config),
            controls_enabled: config.camera.controls_enabled,
            mouse_look: config.camera.mouse_look,
        }
    }

    /// Apply this frame's input to the camera
    pub fn process_input(&mut self, input: &InputState, delta_time: f32) {
        if self.controls_enabled {
            let movement = match self.camera {
                Camera::TwoD(_) => CameraMovement::from_input_2d(input),
                Camera::ThreeD(_) => CameraMovement::from_input(input),
            };
            if !movement.is_empty() {
                self.camera.apply_movement(movement, delta_time);
            }
        }
        if self.mouse_look {
            self.camera.mouse_look(input);
        }
    }

    /// Process input, then recompute the view
    pub fn advance(&mut self, input: &InputState, delta_time: f32) {
        self.process_input(input, delta_time);
        self.camera.look();
    }
}

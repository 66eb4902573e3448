//! # Engine Configuration
//!
//! All settings the frame scheduler reads at startup, grouped by subsystem.
//! Every struct is serde-enabled with per-field defaults, so a config file
//! only needs to name the values it changes:
//!
//! ```toml
//! log_level = "debug"
//!
//! [renderer]
//! dimension = "3d"
//! max_fps = 144
//!
//! [camera]
//! movement = "time_scaled"
//! speed = 4.0
//! ```
//!
//! ## Configuration Categories
//!
//! - **Window**: title and surface size
//! - **Renderer**: dimensionality, frame cap, culling distance, optional passes
//! - **Camera**: movement policy, mouse-look tuning, projection
//! - **Collision**: mouse collider size

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Rendering dimensionality; selects the camera variant and the culling test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Dimension {
    /// Orthographic 2D rendering in pixel space
    #[default]
    #[serde(rename = "2d")]
    TwoD,
    /// Perspective 3D rendering
    #[serde(rename = "3d")]
    ThreeD,
}

/// How camera movement speed relates to frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementPolicy {
    /// Move by `speed` every frame a movement key is held, regardless of
    /// frame time
    #[default]
    FixedStep,
    /// Move by `speed * delta_time`, so `speed` is units per second
    TimeScaled,
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Whether window is resizable
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Engine".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// 2D or 3D rendering
    pub dimension: Dimension,
    /// Frame-rate cap; `None` disables the frame-time floor
    pub max_fps: Option<u32>,
    /// Global render distance used for copy culling
    pub render_distance: f32,
    /// Render into an off-screen target and compose it at the end of the frame
    pub post_processing: bool,
    /// Draw the skybox (3D only)
    pub skybox: bool,
    /// Clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            dimension: Dimension::TwoD,
            max_fps: Some(60),
            render_distance: 1000.0,
            post_processing: false,
            skybox: false,
            clear_color: [0.1, 0.1, 0.12, 1.0],
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Movement magnitude per step (or per second with `TimeScaled`)
    pub speed: f32,
    /// Mouse-look sensitivity in degrees per pixel
    pub sensitivity: f32,
    /// Mouse delta smoothing factor in (0, 1]; 1.0 applies deltas unfiltered
    pub mouse_smoothing: f32,
    /// Movement speed policy
    pub movement: MovementPolicy,
    /// Whether keyboard movement is applied
    pub controls_enabled: bool,
    /// Whether mouse movement rotates the 3D camera
    pub mouse_look: bool,
    /// Vertical field of view in degrees (3D)
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Initial position; pixels in 2D, world units in 3D
    pub start_position: Option<[f32; 3]>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 0.05,
            sensitivity: 0.1,
            mouse_smoothing: 1.0,
            movement: MovementPolicy::FixedStep,
            controls_enabled: true,
            mouse_look: true,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            start_position: None,
        }
    }
}

/// Collision configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of the square collider used for mouse hit-testing
    pub mouse_collider_size: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { mouse_collider_size: 5.0 }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Collision settings
    pub collision: CollisionConfig,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            renderer: RendererConfig::default(),
            camera: CameraConfig::default(),
            collision: CollisionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Set the window title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Set the window size
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Set the rendering dimensionality
    #[must_use]
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.renderer.dimension = dimension;
        self
    }

    /// Set the frame-rate cap
    #[must_use]
    pub fn with_max_fps(mut self, max_fps: Option<u32>) -> Self {
        self.renderer.max_fps = max_fps;
        self
    }

    /// Set the global render distance
    #[must_use]
    pub fn with_render_distance(mut self, distance: f32) -> Self {
        self.renderer.render_distance = distance;
        self
    }

    /// Set the camera movement policy
    #[must_use]
    pub fn with_movement(mut self, movement: MovementPolicy) -> Self {
        self.camera.movement = movement;
        self
    }

    /// Screen size as floats, as consumed by the camera and mouse transforms
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn screen_size(&self) -> (f32, f32) {
        (self.window.width as f32, self.window.height as f32)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.renderer.max_fps == Some(0) {
            return Err(ConfigError::Invalid("max_fps must be positive".to_string()));
        }
        if self.renderer.render_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "render_distance must be positive, got {}",
                self.renderer.render_distance
            )));
        }
        if !(self.camera.mouse_smoothing > 0.0 && self.camera.mouse_smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "mouse_smoothing must be in (0, 1], got {}",
                self.camera.mouse_smoothing
            )));
        }
        if self.camera.near >= self.camera.far {
            return Err(ConfigError::Invalid(format!(
                "near plane {} must be closer than far plane {}",
                self.camera.near, self.camera.far
            )));
        }
        if self.collision.mouse_collider_size <= 0.0 {
            return Err(ConfigError::Invalid("mouse_collider_size must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert_eq!(EngineConfig::default().collision.mouse_collider_size, 5.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            "log_level = \"debug\"\n[renderer]\ndimension = \"3d\"\nmax_fps = 144\n[camera]\nmovement = \"time_scaled\"\n",
        )
        .unwrap();
        assert_eq!(config.renderer.dimension, Dimension::ThreeD);
        assert_eq!(config.renderer.max_fps, Some(144));
        assert_eq!(config.camera.movement, MovementPolicy::TimeScaled);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_ron_round_trip() {
        let config = EngineConfig::default().with_dimension(Dimension::ThreeD).with_max_fps(None);
        let text = ron::to_string(&config).unwrap();
        let back: EngineConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(EngineConfig::default().with_window_size(0, 10).validate().is_err());
        assert!(EngineConfig::default().with_max_fps(Some(0)).validate().is_err());
        assert!(EngineConfig::default().with_render_distance(0.0).validate().is_err());

        let mut config = EngineConfig::default();
        config.camera.mouse_smoothing = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(config.validate().is_err());
    }
}

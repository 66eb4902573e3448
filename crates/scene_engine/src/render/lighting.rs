//! Lighting environment
//!
//! A [`LightingEnvironment`] is owned by the engine, editable from the frame
//! callback and uploaded to the backend once per frame before any entity
//! is drawn. Backends that cannot light (flat 2D materials) read only the
//! ambient term.

use crate::foundation::math::Vec3;

/// Kind of a [`Light`], for backends that bucket lights per shader slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    /// Parallel rays with no position
    Directional,
    /// Omnidirectional with falloff
    Point,
    /// Cone with falloff
    Spot,
}

/// A light source
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Parallel rays, e.g. the sun
    Directional {
        /// Unit direction the light travels in
        direction: Vec3,
        /// Linear RGB
        color: Vec3,
        /// Scalar applied to `color`
        intensity: f32,
    },
    /// Emits in every direction from a position
    Point {
        /// World position
        position: Vec3,
        /// Linear RGB
        color: Vec3,
        /// Scalar applied to `color`
        intensity: f32,
        /// Distance at which the contribution reaches zero
        range: f32,
    },
    /// Emits in a cone from a position
    Spot {
        /// World position
        position: Vec3,
        /// Unit cone axis
        direction: Vec3,
        /// Linear RGB
        color: Vec3,
        /// Scalar applied to `color`
        intensity: f32,
        /// Distance at which the contribution reaches zero
        range: f32,
        /// Inner and outer cone half-angles in radians
        cone: (f32, f32),
    },
}

impl Light {
    /// Directional light; `direction` is normalized
    #[must_use]
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self::Directional {
            direction: direction.normalize(),
            color,
            intensity,
        }
    }

    /// Point light
    #[must_use]
    pub const fn point(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self::Point {
            position,
            color,
            intensity,
            range,
        }
    }

    /// Spot light; `direction` is normalized and the outer angle is never
    /// narrower than the inner one
    #[must_use]
    pub fn spot(position: Vec3, direction: Vec3, color: Vec3, intensity: f32, range: f32, cone: (f32, f32)) -> Self {
        let (inner, outer) = cone;
        Self::Spot {
            position,
            direction: direction.normalize(),
            color,
            intensity,
            range,
            cone: (inner, outer.max(inner)),
        }
    }

    /// Kind of this light
    #[must_use]
    pub const fn kind(&self) -> LightType {
        match self {
            Self::Directional { .. } => LightType::Directional,
            Self::Point { .. } => LightType::Point,
            Self::Spot { .. } => LightType::Spot,
        }
    }

    /// Color already scaled by intensity
    #[must_use]
    pub fn radiance(&self) -> Vec3 {
        match self {
            Self::Directional { color, intensity, .. }
            | Self::Point { color, intensity, .. }
            | Self::Spot { color, intensity, .. } => color * *intensity,
        }
    }
}

/// Ambient term plus the lights uploaded each frame
#[derive(Debug, Clone, PartialEq)]
pub struct LightingEnvironment {
    /// Lights in upload order
    pub lights: Vec<Light>,
    /// Ambient color
    pub ambient_color: Vec3,
    /// Ambient intensity
    pub ambient_intensity: f32,
}

impl LightingEnvironment {
    /// No lights and a dim white ambient
    #[must_use]
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            ambient_color: Vec3::new(1.0, 1.0, 1.0),
            ambient_intensity: 0.1,
        }
    }

    /// Append a light
    #[must_use]
    pub fn add_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Replace the ambient term
    #[must_use]
    pub fn with_ambient(mut self, color: Vec3, intensity: f32) -> Self {
        self.ambient_color = color;
        self.ambient_intensity = intensity;
        self
    }

    /// Full-strength ambient and no lights, the default for 2D
    #[must_use]
    pub fn unlit() -> Self {
        Self::new().with_ambient(Vec3::new(1.0, 1.0, 1.0), 1.0)
    }

    /// Sky-tinted ambient plus one sun, the default for 3D
    #[must_use]
    pub fn outdoor_daylight() -> Self {
        Self::new()
            .with_ambient(Vec3::new(0.5, 0.7, 1.0), 0.3)
            .add_light(Light::directional(
                Vec3::new(-0.2, -1.0, -0.3),
                Vec3::new(1.0, 1.0, 0.9),
                1.0,
            ))
    }

    /// Number of lights of a kind
    #[must_use]
    pub fn count(&self, kind: LightType) -> usize {
        self.lights.iter().filter(|light| light.kind() == kind).count()
    }

    /// Ambient color scaled by its intensity
    #[must_use]
    pub fn ambient(&self) -> Vec3 {
        self.ambient_color * self.ambient_intensity
    }
}

impl Default for LightingEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

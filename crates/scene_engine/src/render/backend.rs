//! Backend abstraction for the rendering collaborator
//!
//! The frame scheduler drives a [`RenderBackend`] through a fixed sequence
//! each frame: `begin_frame`, `set_lighting`, then per entity
//! `bind_geometry` / `bind_material` / `set_uniform_mat4` / `draw`, then
//! text, optional post-processing composition and `present`. Geometry,
//! material and texture data live behind opaque handles created by asset
//! loading outside the core.

use crate::core::config::{RendererConfig, WindowConfig};
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{LightingEnvironment, RenderError};
use crate::scene::{Entity, TextElement};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Uniform name for the view matrix
pub const UNIFORM_VIEW: &str = "view";
/// Uniform name for the projection matrix
pub const UNIFORM_PROJECTION: &str = "projection";
/// Uniform name for the model matrix
pub const UNIFORM_MODEL: &str = "model";

/// Handle to uploaded geometry plus the vertex count drawn for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle {
    /// Backend-assigned identifier
    pub id: u64,
    /// Number of vertices covered by one draw call
    pub vertex_count: u32,
}

impl GeometryHandle {
    /// Create a geometry handle
    #[must_use]
    pub const fn new(id: u64, vertex_count: u32) -> Self {
        Self { id, vertex_count }
    }
}

/// Handle to a material resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialHandle(pub u64);

/// Handle to a texture resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Where the frame is drawn before presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTarget {
    /// Draw straight to the window surface
    Screen,
    /// Draw into the off-screen target consumed by post-processing
    Offscreen,
}

/// Skybox drawn around the 3D camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skybox {
    /// Cube geometry
    pub geometry: GeometryHandle,
    /// Cubemap material
    pub material: MaterialHandle,
    /// Uniform scale applied to the cube
    pub scale: f32,
}

impl Skybox {
    /// Model matrix re-centered on the camera so the box never translates
    #[must_use]
    pub fn model_matrix(&self, camera_position: Vec3) -> Mat4 {
        Mat4::new_translation(&camera_position) * Mat4::new_scaling(self.scale)
    }
}

/// Main rendering backend trait
///
/// Implementations own every graphics-API object. All methods are called
/// from the single render thread.
pub trait RenderBackend {
    /// Open the surface and compile default materials
    fn initialize(&mut self, renderer: &RendererConfig, window: &WindowConfig) -> BackendResult<()>;

    /// Allocate per-entity GPU resources ahead of the first frame
    fn prepare_entity(&mut self, entity: &Entity) -> BackendResult<()>;

    /// Clear targets and start recording a frame
    fn begin_frame(&mut self, target: FrameTarget, clear_color: [f32; 4]) -> BackendResult<()>;

    /// Upload the lighting environment for this frame
    fn set_lighting(&mut self, lighting: &LightingEnvironment) -> BackendResult<()>;

    /// Bind geometry for subsequent draws
    fn bind_geometry(&mut self, geometry: GeometryHandle) -> BackendResult<()>;

    /// Bind a material with a tint/darkness scalar and the elapsed time
    fn bind_material(&mut self, material: MaterialHandle, tint: f32, elapsed: f32) -> BackendResult<()>;

    /// Bind the textures attached to the current entity
    fn bind_textures(&mut self, textures: &[TextureHandle]) -> BackendResult<()>;

    /// Upload a 4x4 matrix uniform
    fn set_uniform_mat4(&mut self, name: &str, matrix: &Mat4) -> BackendResult<()>;

    /// Issue one draw call over the bound geometry
    fn draw(&mut self, vertex_count: u32) -> BackendResult<()>;

    /// Draw a text element with the given view
    fn draw_text(&mut self, text: &TextElement, view: &Mat4) -> BackendResult<()>;

    /// Draw the captured off-screen frame through the full-screen pass
    fn compose_post_processing(&mut self) -> BackendResult<()>;

    /// Swap buffers
    fn present(&mut self) -> BackendResult<()>;

    /// Release backend resources
    fn shutdown(&mut self) {}
}

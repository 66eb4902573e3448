//! Command-recording backend
//!
//! [`RecordingBackend`] implements [`RenderBackend`] without a GPU: every
//! call is appended to a command list. Tests assert on the recorded
//! sequence; headless runs use it with history disabled and read the
//! per-frame counters.

use crate::core::config::{RendererConfig, WindowConfig};
use crate::foundation::math::Mat4;
use crate::render::backend::BackendResult;
use crate::render::{
    FrameTarget, GeometryHandle, LightingEnvironment, MaterialHandle, RenderBackend, RenderError,
    TextureHandle,
};
use crate::scene::{Entity, EntityId, TextElement};

/// A single recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Backend initialized
    Initialize,
    /// Entity resources prepared
    Prepare(EntityId),
    /// Frame started
    BeginFrame(FrameTarget),
    /// Lighting uploaded
    SetLighting {
        /// Number of lights in the environment
        light_count: usize,
    },
    /// Geometry bound
    BindGeometry(GeometryHandle),
    /// Material bound
    BindMaterial {
        /// Material bound
        material: MaterialHandle,
        /// Tint or darkness scalar
        tint: f32,
    },
    /// Textures bound
    BindTextures(Vec<TextureHandle>),
    /// Matrix uniform uploaded
    SetUniform {
        /// Uniform name
        name: String,
        /// Matrix value
        matrix: Mat4,
    },
    /// Draw call issued
    Draw {
        /// Vertices drawn
        vertex_count: u32,
    },
    /// Text drawn
    DrawText(String),
    /// Post-processing composed
    ComposePostProcessing,
    /// Frame presented
    Present,
    /// Backend shut down
    Shutdown,
}

/// Backend that records calls instead of drawing
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<RenderCommand>,
    keep_history: bool,
    frames_presented: u64,
    draws_this_frame: usize,
    draws_last_frame: usize,
    fail_on_frame: Option<u64>,
}

impl RecordingBackend {
    /// Backend that keeps every command ever issued
    #[must_use]
    pub fn new() -> Self {
        Self {
            keep_history: true,
            ..Self::default()
        }
    }

    /// Backend that only keeps the commands of the frame in progress
    #[must_use]
    pub fn current_frame_only() -> Self {
        Self::default()
    }

    /// Make `present` fail on the given frame number (0-based)
    #[must_use]
    pub fn failing_on_frame(mut self, frame: u64) -> Self {
        self.fail_on_frame = Some(frame);
        self
    }

    /// Recorded commands
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take and clear the recorded commands
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of frames presented so far
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Draw calls issued in the last presented frame
    #[must_use]
    pub const fn draws_last_frame(&self) -> usize {
        self.draws_last_frame
    }

    /// Draw calls recorded so far
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw { .. }))
            .count()
    }

    /// Model matrices uploaded so far, in order
    #[must_use]
    pub fn model_matrices(&self) -> Vec<Mat4> {
        self.uniforms(super::UNIFORM_MODEL)
    }

    /// Values uploaded for a named uniform, in order
    #[must_use]
    pub fn uniforms(&self, uniform: &str) -> Vec<Mat4> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::SetUniform { name, matrix } if name == uniform => Some(*matrix),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }
}

impl RenderBackend for RecordingBackend {
    fn initialize(&mut self, renderer: &RendererConfig, window: &WindowConfig) -> BackendResult<()> {
        log::info!(
            "Recording backend initialized: {}x{} {:?}",
            window.width,
            window.height,
            renderer.dimension
        );
        self.record(RenderCommand::Initialize);
        Ok(())
    }

    fn prepare_entity(&mut self, entity: &Entity) -> BackendResult<()> {
        self.record(RenderCommand::Prepare(entity.id()));
        Ok(())
    }

    fn begin_frame(&mut self, target: FrameTarget, _clear_color: [f32; 4]) -> BackendResult<()> {
        if !self.keep_history {
            self.commands.clear();
        }
        self.draws_this_frame = 0;
        self.record(RenderCommand::BeginFrame(target));
        Ok(())
    }

    fn set_lighting(&mut self, lighting: &LightingEnvironment) -> BackendResult<()> {
        self.record(RenderCommand::SetLighting { light_count: lighting.lights.len() });
        Ok(())
    }

    fn bind_geometry(&mut self, geometry: GeometryHandle) -> BackendResult<()> {
        self.record(RenderCommand::BindGeometry(geometry));
        Ok(())
    }

    fn bind_material(&mut self, material: MaterialHandle, tint: f32, _elapsed: f32) -> BackendResult<()> {
        self.record(RenderCommand::BindMaterial { material, tint });
        Ok(())
    }

    fn bind_textures(&mut self, textures: &[TextureHandle]) -> BackendResult<()> {
        self.record(RenderCommand::BindTextures(textures.to_vec()));
        Ok(())
    }

    fn set_uniform_mat4(&mut self, name: &str, matrix: &Mat4) -> BackendResult<()> {
        self.record(RenderCommand::SetUniform { name: name.to_string(), matrix: *matrix });
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32) -> BackendResult<()> {
        self.draws_this_frame += 1;
        self.record(RenderCommand::Draw { vertex_count });
        Ok(())
    }

    fn draw_text(&mut self, text: &TextElement, _view: &Mat4) -> BackendResult<()> {
        self.record(RenderCommand::DrawText(text.content.clone()));
        Ok(())
    }

    fn compose_post_processing(&mut self) -> BackendResult<()> {
        self.record(RenderCommand::ComposePostProcessing);
        Ok(())
    }

    fn present(&mut self) -> BackendResult<()> {
        if self.fail_on_frame == Some(self.frames_presented) {
            return Err(RenderError::RenderingFailed(format!(
                "present failed on frame {}",
                self.frames_presented
            )));
        }
        self.record(RenderCommand::Present);
        self.draws_last_frame = self.draws_this_frame;
        self.frames_presented += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.record(RenderCommand::Shutdown);
    }
}

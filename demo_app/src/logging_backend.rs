//! Backend that records the current frame and logs a summary on present

use scene_engine::core::config::{RendererConfig, WindowConfig};
use scene_engine::foundation::math::Mat4;
use scene_engine::render::backend::BackendResult;
use scene_engine::render::{
    FrameTarget, GeometryHandle, LightingEnvironment, MaterialHandle, RecordingBackend, RenderBackend,
    RenderCommand, TextureHandle,
};
use scene_engine::scene::{Entity, TextElement};

/// Logs how many draws each frame issued, every `interval` frames
#[derive(Debug)]
pub struct LoggingBackend {
    inner: RecordingBackend,
    interval: u64,
}

impl LoggingBackend {
    pub fn new(interval: u64) -> Self {
        Self {
            inner: RecordingBackend::current_frame_only(),
            interval: interval.max(1),
        }
    }

    pub const fn frames_presented(&self) -> u64 {
        self.inner.frames_presented()
    }
}

impl RenderBackend for LoggingBackend {
    fn initialize(&mut self, renderer: &RendererConfig, window: &WindowConfig) -> BackendResult<()> {
        log::info!(
            "Logging backend up: {}x{} '{}', {:?}",
            window.width,
            window.height,
            window.title,
            renderer.dimension
        );
        self.inner.initialize(renderer, window)
    }

    fn prepare_entity(&mut self, entity: &Entity) -> BackendResult<()> {
        log::debug!("Preparing entity {:?}", entity.id());
        self.inner.prepare_entity(entity)
    }

    fn begin_frame(&mut self, target: FrameTarget, clear_color: [f32; 4]) -> BackendResult<()> {
        self.inner.begin_frame(target, clear_color)
    }

    fn set_lighting(&mut self, lighting: &LightingEnvironment) -> BackendResult<()> {
        self.inner.set_lighting(lighting)
    }

    fn bind_geometry(&mut self, geometry: GeometryHandle) -> BackendResult<()> {
        self.inner.bind_geometry(geometry)
    }

    fn bind_material(&mut self, material: MaterialHandle, tint: f32, elapsed: f32) -> BackendResult<()> {
        self.inner.bind_material(material, tint, elapsed)
    }

    fn bind_textures(&mut self, textures: &[TextureHandle]) -> BackendResult<()> {
        self.inner.bind_textures(textures)
    }

    fn set_uniform_mat4(&mut self, name: &str, matrix: &Mat4) -> BackendResult<()> {
        self.inner.set_uniform_mat4(name, matrix)
    }

    fn draw(&mut self, vertex_count: u32) -> BackendResult<()> {
        self.inner.draw(vertex_count)
    }

    fn draw_text(&mut self, text: &TextElement, view: &Mat4) -> BackendResult<()> {
        self.inner.draw_text(text, view)
    }

    fn compose_post_processing(&mut self) -> BackendResult<()> {
        self.inner.compose_post_processing()
    }

    fn present(&mut self) -> BackendResult<()> {
        let texts: Vec<String> = self
            .inner
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::DrawText(content) => Some(content.clone()),
                _ => None,
            })
            .collect();
        self.inner.present()?;

        let frame = self.inner.frames_presented();
        if frame % self.interval == 0 {
            log::info!(
                "Frame {}: {} draws, text {:?}",
                frame,
                self.inner.draws_last_frame(),
                texts
            );
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        log::info!("Logging backend shut down after {} frames", self.inner.frames_presented());
        self.inner.shutdown();
    }
}

//! Core engine implementation: the frame scheduler
//!
//! [`Engine`] owns the scene graph, the collision engine, the camera, the
//! input snapshot and the two collaborators it is generic over: a
//! [`RenderBackend`] and a [`Platform`]. One call to
//! [`Engine::run_frame`] performs, in order:
//!
//! 1. poll input
//! 2. begin frame (off-screen target when post-processing is enabled)
//! 3. upload lighting
//! 4. skybox (3D only, when enabled)
//! 5. clear the current copies of every active entity, then draw each
//!    entity of an automatically rendered scene
//! 6. text
//! 7. the application callback, which may draw entities of manually
//!    rendered scenes through [`FrameContext::render_entity`]
//! 8. entity updates (gravity)
//! 9. collision, using the camera position cached at the last advance
//! 10. motion commit
//! 11. UI buttons
//! 12. camera advance, refreshing the cached position
//! 13. post-processing composition
//! 14. present
//! 15. frame pacing
//!
//! Copy culling in step 5 and collision in step 9 both use the cached
//! camera position, so a copy the camera cannot see is never collided with
//! in the same frame.

use std::collections::HashSet;

use crate::{
    application::{AppError, Application},
    camera::{Camera, CameraRig},
    config::ConfigError,
    core::config::{Dimension, EngineConfig},
    foundation::{
        math::{Mat4, Vec3},
        time::{FramePacer, Timer},
    },
    input::{InputState, MouseButton},
    physics::{CollisionControl, CollisionError, ScreenSpace},
    platform::{Platform, PlatformError},
    render::{
        FrameStats, FrameTarget, LightingEnvironment, RenderBackend, RenderError, RenderPass, Skybox,
        UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW,
    },
    scene::{Entity, EntityId, SceneControl, SceneError},
};
use thiserror::Error;
use tokio::sync::watch;

/// Renderer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    /// Created, collaborators not initialized yet
    Initializing,
    /// Frames are being produced
    Running,
    /// Tearing down after a close request
    Terminating,
    /// Terminal
    Stopped,
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// An operation was called in the wrong lifecycle state
    #[error("Invalid renderer state: expected {expected:?}, found {actual:?}")]
    InvalidState {
        /// State the operation requires
        expected: RendererState,
        /// Current state
        actual: RendererState,
    },

    /// Rendering error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Scene error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Collision error
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Platform error
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Application callback error
    #[error(transparent)]
    ApplicationError(Box<AppError>),
}

/// Handle that reports when the renderer has stopped
///
/// Obtainable before or after the renderer starts; every clone observes the
/// same one-shot transition.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    receiver: watch::Receiver<bool>,
}

impl CompletionSignal {
    /// Whether the renderer has stopped
    #[must_use]
    pub fn is_done(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Wait until the renderer has stopped
    ///
    /// Also returns if the engine is dropped without stopping.
    pub async fn wait(mut self) {
        if self.receiver.wait_for(|done| *done).await.is_err() {
            log::debug!("Engine dropped before signalling completion");
        }
    }
}

/// Matrices and culling inputs shared by every draw of one frame
#[derive(Debug, Clone, Copy)]
struct FrameInputs {
    view: Mat4,
    static_view: Mat4,
    projection: Mat4,
    camera_position: Vec3,
    render_distance: f32,
    dimension: Dimension,
    elapsed: f32,
}

impl FrameInputs {
    const fn pass(&self) -> RenderPass<'_> {
        RenderPass {
            view: &self.view,
            static_view: &self.static_view,
            projection: &self.projection,
            camera_position: self.camera_position,
            render_distance: self.render_distance,
            dimension: self.dimension,
            elapsed: self.elapsed,
        }
    }
}

/// Everything the application callback may read or mutate in one frame
pub struct FrameContext<'a> {
    /// Scenes and the entity store
    pub scenes: &'a mut SceneControl,
    /// Collision groups, links and mouse registrations
    pub collisions: &'a mut CollisionControl,
    /// Lights uploaded at the start of the next frame
    pub lighting: &'a mut LightingEnvironment,
    /// Skybox drawn in 3D
    pub skybox: &'a mut Option<Skybox>,
    /// Input snapshot for this frame
    pub input: &'a InputState,
    /// Seconds since the previous frame, never below the pacing floor
    pub delta_time: f32,
    /// Seconds since the renderer started
    pub elapsed: f32,
    /// Frames completed before this one
    pub frame: u64,
    /// Screen size in pixels
    pub screen_size: (f32, f32),
    /// Camera position used for culling and collision this frame
    pub camera_position: Vec3,
    /// Draw counters for this frame so far
    pub stats: FrameStats,
    camera: &'a mut CameraRig,
    prepared: &'a mut HashSet<EntityId>,
    close_requested: &'a mut bool,
    backend: &'a mut dyn RenderBackend,
    frame_inputs: Option<FrameInputs>,
}

impl FrameContext<'_> {
    /// The camera
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera.camera
    }

    /// The camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera.camera
    }

    /// Enable or disable keyboard camera movement
    pub fn set_camera_controls(&mut self, enabled: bool) {
        self.camera.controls_enabled = enabled;
    }

    /// Enable or disable 3D mouse-look
    pub fn set_mouse_look(&mut self, enabled: bool) {
        if enabled && !self.camera.mouse_look {
            self.camera.camera.reset_mouse_baseline();
        }
        self.camera.mouse_look = enabled;
    }

    /// Remove an entity from its scene, the store and every collision table
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, SceneError> {
        self.collisions.unregister(id);
        self.prepared.remove(&id);
        self.scenes.remove_entity(id)
    }

    /// Stop the renderer after this frame
    pub fn request_close(&mut self) {
        *self.close_requested = true;
    }

    /// Draw one entity with this frame's camera, culling copies exactly as
    /// the automatic pass does
    ///
    /// Meant for scenes with automatic rendering turned off. Inactive
    /// entities are skipped. Only available from the per-frame callback.
    pub fn render_entity(&mut self, id: EntityId) -> Result<(), EngineError> {
        let Some(inputs) = self.frame_inputs.as_ref() else {
            return Err(RenderError::RenderingFailed("no frame in progress".to_string()).into());
        };
        let entity = self.scenes.entities_mut().get_mut(id).ok_or(SceneError::UnknownEntity(id))?;
        if !entity.is_active() {
            log::trace!("Skipping draw of inactive entity {:?}", id);
            return Ok(());
        }
        if self.prepared.insert(id) {
            self.backend.prepare_entity(entity)?;
        }
        inputs.pass().submit(&mut *self.backend, entity, &mut self.stats)?;
        Ok(())
    }
}

/// Frame scheduler
pub struct Engine<B: RenderBackend, P: Platform> {
    config: EngineConfig,
    backend: B,
    platform: P,
    scenes: SceneControl,
    collisions: CollisionControl,
    camera: CameraRig,
    input: InputState,
    lighting: LightingEnvironment,
    skybox: Option<Skybox>,
    timer: Timer,
    pacer: FramePacer,
    state: RendererState,
    screen: (f32, f32),
    cached_camera_position: Vec3,
    prepared: HashSet<EntityId>,
    stats: FrameStats,
    close_requested: bool,
    completion: watch::Sender<bool>,
}

impl<B: RenderBackend, P: Platform> Engine<B, P> {
    /// Create an engine; nothing is initialized until
    /// [`Engine::initialize`] or [`Engine::start_renderer`]
    pub fn new(config: EngineConfig, backend: B, platform: P) -> Result<Self, EngineError> {
        config.validate()?;
        crate::foundation::logging::init(&config.log_level);
        log::info!("Creating engine: '{}' ({:?})", config.window.title, config.renderer.dimension);

        let camera = CameraRig::from_config(&config);
        let cached_camera_position = camera.camera.position();
        let pacer = FramePacer::new(config.renderer.max_fps);
        let mut timer = Timer::new();
        timer.prime(pacer.initial_delta());
        let (completion, _) = watch::channel(false);
        let lighting = match config.renderer.dimension {
            Dimension::TwoD => LightingEnvironment::unlit(),
            Dimension::ThreeD => LightingEnvironment::outdoor_daylight(),
        };

        Ok(Self {
            screen: config.screen_size(),
            collisions: CollisionControl::new(config.collision.mouse_collider_size),
            config,
            backend,
            platform,
            scenes: SceneControl::new(),
            camera,
            input: InputState::new(),
            lighting,
            skybox: None,
            timer,
            pacer,
            state: RendererState::Initializing,
            cached_camera_position,
            prepared: HashSet::new(),
            stats: FrameStats::default(),
            close_requested: false,
            completion,
        })
    }

    /// Initialize the backend and prepare every entity instanced so far
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.expect_state(RendererState::Initializing)?;
        self.backend.initialize(&self.config.renderer, &self.config.window)?;
        for (id, entity) in self.scenes.entities().iter() {
            self.backend.prepare_entity(entity)?;
            self.prepared.insert(id);
        }
        self.cached_camera_position = self.camera.camera.position();
        self.state = RendererState::Running;
        log::info!("Renderer initialized with {} entities", self.prepared.len());
        Ok(())
    }

    /// Run frames until the platform or the application asks to close, then
    /// tear down and signal completion
    ///
    /// Initializes first if [`Engine::initialize`] has not run. A frame
    /// error stops the loop; teardown still runs and the error is returned.
    pub fn start_renderer<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<(), EngineError> {
        if self.state == RendererState::Initializing {
            self.initialize()?;
        }
        self.expect_state(RendererState::Running)?;

        let initialized = app.initialize(&mut self.context(None)).map_err(application_error);
        if let Err(e) = initialized {
            log::error!("Application initialization failed: {}", e);
            self.terminate(app);
            return Err(e);
        }

        log::info!("Starting main loop...");
        self.pacer.reset();
        let result = loop {
            if self.close_requested || self.platform.should_close() {
                break Ok(());
            }
            if let Err(e) = self.run_frame(app) {
                log::error!("Frame {} failed: {}", self.timer.frame_count(), e);
                break Err(e);
            }
        };

        self.terminate(app);
        result
    }

    /// Produce one frame
    pub fn run_frame<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<(), EngineError> {
        self.expect_state(RendererState::Running)?;

        self.input.begin_frame();
        self.platform.poll(&mut self.input);
        self.sync_screen_size();

        let renderer = &self.config.renderer;
        let target = if renderer.post_processing { FrameTarget::Offscreen } else { FrameTarget::Screen };
        self.backend.begin_frame(target, renderer.clear_color)?;
        self.backend.set_lighting(&self.lighting)?;

        let inputs = FrameInputs {
            view: *self.camera.camera.view(),
            static_view: Camera::static_view(),
            projection: self.camera.camera.projection(),
            camera_position: self.cached_camera_position,
            render_distance: renderer.render_distance,
            dimension: self.camera.camera.dimension(),
            elapsed: self.timer.total_time(),
        };
        let mut stats = FrameStats::default();

        if inputs.dimension == Dimension::ThreeD && renderer.skybox {
            if let Some(skybox) = self.skybox {
                self.draw_skybox(&skybox, &inputs)?;
            }
        }

        // Entities that are not drawn this frame must not collide with last
        // frame's copies.
        let active = self.scenes.active_entities();
        for id in &active {
            if let Some(entity) = self.scenes.entities_mut().get_mut(*id) {
                entity.clear_current_copies();
            }
        }

        let pass = inputs.pass();
        for id in self.scenes.rendered_entities() {
            let entity = self.scenes.entities_mut().get_mut(id).ok_or(SceneError::UnknownEntity(id))?;
            if self.prepared.insert(id) {
                self.backend.prepare_entity(entity)?;
            }
            pass.submit(&mut self.backend, entity, &mut stats)?;
        }

        for text in self.scenes.active_texts() {
            let text_view = if text.is_static { &inputs.static_view } else { &inputs.view };
            self.backend.draw_text(text, text_view)?;
            stats.texts += 1;
        }

        self.stats = stats;
        let delta_time = self.timer.delta_time();
        self.stats = {
            let mut ctx = self.context(Some(inputs));
            app.update(&mut ctx).map_err(application_error)?;
            ctx.stats
        };

        let active = self.scenes.active_entities();
        for id in &active {
            if let Some(entity) = self.scenes.entities_mut().get_mut(*id) {
                entity.update(delta_time);
            }
        }

        let screen_space = ScreenSpace::new(self.cached_camera_position, self.screen);
        self.collisions
            .update(self.scenes.entities_mut(), &self.input, &screen_space)?;

        for id in &active {
            if let Some(entity) = self.scenes.entities_mut().get_mut(*id) {
                entity.commit_motion();
            }
        }

        let left_down = self.input.is_mouse_down(MouseButton::Left);
        let collisions = &self.collisions;
        let input = &self.input;
        let clicked = self
            .scenes
            .update_ui(|entity| collisions.mouse_over(entity, input, &screen_space), left_down);
        if !clicked.is_empty() {
            log::trace!("{} button(s) clicked", clicked.len());
        }

        self.camera.advance(&self.input, delta_time);
        self.cached_camera_position = self.camera.camera.position();

        if self.config.renderer.post_processing {
            self.backend.compose_post_processing()?;
        }
        self.backend.present()?;

        let delta = self.pacer.finish_frame();
        self.timer.advance(delta);
        Ok(())
    }

    /// Ask the renderer to stop after the current frame
    pub fn request_close(&mut self) {
        self.close_requested = true;
        self.platform.request_close();
    }

    /// Completion handle; resolves once the renderer reaches
    /// [`RendererState::Stopped`]
    #[must_use]
    pub fn completion(&self) -> CompletionSignal {
        CompletionSignal {
            receiver: self.completion.subscribe(),
        }
    }

    /// Remove an entity from its scene, the store and every collision table
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, EngineError> {
        self.collisions.unregister(id);
        self.prepared.remove(&id);
        Ok(self.scenes.remove_entity(id)?)
    }

    /// Set or clear the skybox
    pub fn set_skybox(&mut self, skybox: Option<Skybox>) {
        self.skybox = skybox;
    }

    /// Replace the lighting environment
    pub fn set_lighting(&mut self, lighting: LightingEnvironment) {
        self.lighting = lighting;
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> RendererState {
        self.state
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scenes and entities
    #[must_use]
    pub const fn scenes(&self) -> &SceneControl {
        &self.scenes
    }

    /// Scenes and entities, mutably
    pub fn scenes_mut(&mut self) -> &mut SceneControl {
        &mut self.scenes
    }

    /// Scenes and the collision engine together, for registering entities
    /// with collision groups outside a frame
    pub fn scenes_and_collisions_mut(&mut self) -> (&mut SceneControl, &mut CollisionControl) {
        (&mut self.scenes, &mut self.collisions)
    }

    /// Collision engine
    #[must_use]
    pub const fn collisions(&self) -> &CollisionControl {
        &self.collisions
    }

    /// Collision engine, mutably
    pub fn collisions_mut(&mut self) -> &mut CollisionControl {
        &mut self.collisions
    }

    /// Camera
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera.camera
    }

    /// Camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera.camera
    }

    /// Camera position cached at the last advance
    #[must_use]
    pub const fn cached_camera_position(&self) -> Vec3 {
        self.cached_camera_position
    }

    /// Input snapshot of the last frame
    #[must_use]
    pub const fn input(&self) -> &InputState {
        &self.input
    }

    /// Frame timer
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Counters of the last drawn frame
    #[must_use]
    pub const fn last_frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Render backend
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Render backend, mutably
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Platform
    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// Platform, mutably
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn context(&mut self, frame_inputs: Option<FrameInputs>) -> FrameContext<'_> {
        FrameContext {
            scenes: &mut self.scenes,
            collisions: &mut self.collisions,
            lighting: &mut self.lighting,
            skybox: &mut self.skybox,
            input: &self.input,
            delta_time: self.timer.delta_time(),
            elapsed: self.timer.total_time(),
            frame: self.timer.frame_count(),
            screen_size: self.screen,
            camera_position: self.cached_camera_position,
            stats: self.stats,
            camera: &mut self.camera,
            prepared: &mut self.prepared,
            close_requested: &mut self.close_requested,
            backend: &mut self.backend,
            frame_inputs,
        }
    }

    fn draw_skybox(&mut self, skybox: &Skybox, inputs: &FrameInputs) -> Result<(), RenderError> {
        self.backend.bind_geometry(skybox.geometry)?;
        self.backend.bind_material(skybox.material, 1.0, inputs.elapsed)?;
        self.backend.set_uniform_mat4(UNIFORM_VIEW, &inputs.view)?;
        self.backend.set_uniform_mat4(UNIFORM_PROJECTION, &inputs.projection)?;
        self.backend
            .set_uniform_mat4(UNIFORM_MODEL, &skybox.model_matrix(self.cached_camera_position))?;
        self.backend.draw(skybox.geometry.vertex_count)
    }

    fn sync_screen_size(&mut self) {
        let screen = self.platform.screen_size();
        if screen != self.screen && screen.0 > 0.0 && screen.1 > 0.0 {
            log::debug!("Screen resized to {}x{}", screen.0, screen.1);
            self.screen = screen;
            self.camera.camera.set_screen_size(screen);
        }
    }

    fn terminate<A: Application + ?Sized>(&mut self, app: &mut A) {
        self.state = RendererState::Terminating;
        log::info!("Renderer terminating after {} frames", self.timer.frame_count());

        app.cleanup(&mut self.context(None));
        self.backend.shutdown();
        self.platform.shutdown();

        self.state = RendererState::Stopped;
        self.completion.send_replace(true);
        log::info!("Engine shutdown complete");
    }

    fn expect_state(&self, expected: RendererState) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

fn application_error(error: AppError) -> EngineError {
    match error {
        AppError::Engine(inner) => inner,
        other => EngineError::ApplicationError(Box::new(other)),
    }
}

//! Renderer state machine, error propagation and completion signalling

use super::{block, config, engine, engine_with};
use crate::application::{AppError, Application};
use crate::engine::{Engine, EngineError, FrameContext, RendererState};
use crate::platform::HeadlessPlatform;
use crate::render::{RecordingBackend, RenderCommand, RenderError};

fn noop(_: &mut FrameContext<'_>) -> Result<(), AppError> {
    Ok(())
}

#[derive(Default)]
struct CountingApp {
    initialized: u32,
    updates: u32,
    cleaned_up: u32,
}

impl Application for CountingApp {
    fn initialize(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        self.initialized += 1;
        let level = ctx.scenes.create_scene("level")?;
        ctx.scenes.instance_entity(level, block(0.0, 0.0))?;
        ctx.scenes.set_current_scene(level)?;
        Ok(())
    }

    fn update(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        self.updates += 1;
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut FrameContext<'_>) {
        self.cleaned_up += 1;
    }
}

#[test]
fn test_state_transitions() {
    let mut engine = engine(2);
    assert_eq!(engine.state(), RendererState::Initializing);
    assert!(matches!(
        engine.run_frame(&mut noop),
        Err(EngineError::InvalidState {
            expected: RendererState::Running,
            actual: RendererState::Initializing,
        })
    ));

    engine.initialize().unwrap();
    assert_eq!(engine.state(), RendererState::Running);
    assert!(matches!(engine.initialize(), Err(EngineError::InvalidState { .. })));

    engine.start_renderer(&mut noop).unwrap();
    assert_eq!(engine.state(), RendererState::Stopped);
    assert!(matches!(
        engine.start_renderer(&mut noop),
        Err(EngineError::InvalidState {
            actual: RendererState::Stopped,
            ..
        })
    ));
}

#[test]
fn test_application_hooks_run_in_order() {
    let mut engine = engine(3);
    let mut app = CountingApp::default();

    engine.start_renderer(&mut app).unwrap();

    assert_eq!(app.initialized, 1);
    assert_eq!(app.updates, 3);
    assert_eq!(app.cleaned_up, 1);
    // Created in `initialize`, after the backend was set up.
    assert_eq!(engine.backend().draws_last_frame(), 1);
}

#[test]
fn test_render_failure_stops_loop_and_still_signals() {
    let platform = HeadlessPlatform::new(800.0, 600.0).close_after(10);
    let mut engine = Engine::new(config(), RecordingBackend::new().failing_on_frame(1), platform).unwrap();
    let signal = engine.completion();

    let err = engine.start_renderer(&mut noop).unwrap_err();

    assert!(matches!(err, EngineError::Render(RenderError::RenderingFailed(_))));
    assert_eq!(engine.state(), RendererState::Stopped);
    assert!(signal.is_done());
    assert_eq!(engine.backend().frames_presented(), 1);
    assert_eq!(engine.backend().commands().last(), Some(&RenderCommand::Shutdown));
    assert!(engine.platform().is_shut_down());
}

#[test]
fn test_application_error_propagates() {
    let mut engine = engine(10);
    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        if ctx.frame == 2 {
            return Err(AppError::GameLogic("player fell out of the world".to_string()));
        }
        Ok(())
    };

    let err = engine.start_renderer(&mut app).unwrap_err();

    assert!(matches!(&err, EngineError::ApplicationError(inner) if matches!(**inner, AppError::GameLogic(_))));
    assert_eq!(err.to_string(), "Game logic error: player fell out of the world");
    assert_eq!(engine.backend().frames_presented(), 2);
}

#[test]
fn test_application_error_message_is_not_repeated() {
    let mut engine = engine(3);
    let mut app = |_: &mut FrameContext<'_>| -> Result<(), AppError> { Err(AppError::Custom("boom".to_string())) };

    let err = engine.start_renderer(&mut app).unwrap_err();

    assert_eq!(err.to_string(), "Application error: boom");
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source, None);
}

struct FailingSetup {
    cleaned_up: u32,
    updates: u32,
}

impl Application for FailingSetup {
    fn initialize(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        Err(AppError::Custom("level file missing".to_string()))
    }

    fn update(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        self.updates += 1;
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut FrameContext<'_>) {
        self.cleaned_up += 1;
    }
}

#[test]
fn test_failed_initialize_still_tears_down() {
    let mut engine = engine(5);
    let signal = engine.completion();
    let mut app = FailingSetup {
        cleaned_up: 0,
        updates: 0,
    };

    let err = engine.start_renderer(&mut app).unwrap_err();

    assert_eq!(err.to_string(), "Application error: level file missing");
    assert_eq!(engine.state(), RendererState::Stopped);
    assert!(signal.is_done());
    assert!(engine.platform().is_shut_down());
    assert_eq!(engine.backend().commands().last(), Some(&RenderCommand::Shutdown));
    assert_eq!(engine.backend().frames_presented(), 0);
    assert_eq!((app.updates, app.cleaned_up), (0, 1));
}

#[test]
fn test_render_entity_outside_frame_fails() {
    let mut engine = engine(1);
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let id = engine.scenes_mut().instance_entity(level, block(0.0, 0.0)).unwrap();
    let mut app = DrawsDuringSetup { id };

    let err = engine.start_renderer(&mut app).unwrap_err();

    assert!(matches!(err, EngineError::Render(RenderError::RenderingFailed(_))));
    assert_eq!(engine.state(), RendererState::Stopped);
}

struct DrawsDuringSetup {
    id: crate::scene::EntityId,
}

impl Application for DrawsDuringSetup {
    fn initialize(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        ctx.render_entity(self.id)?;
        Ok(())
    }

    fn update(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        Ok(())
    }
}

#[test]
fn test_missing_geometry_aborts_the_frame() {
    let mut engine = engine(5);
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let bare = crate::scene::Entity::new(crate::core::config::Dimension::TwoD, crate::render::MaterialHandle(1));
    let id = engine.scenes_mut().instance_entity(level, bare).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();

    let err = engine.start_renderer(&mut noop).unwrap_err();
    assert!(matches!(err, EngineError::Render(RenderError::MissingGeometry(missing)) if missing == id));
}

#[test]
fn test_close_requested_from_callback() {
    let mut engine = engine_with(config(), HeadlessPlatform::new(800.0, 600.0));
    let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
        if ctx.frame == 3 {
            ctx.request_close();
        }
        Ok(())
    };

    engine.start_renderer(&mut app).unwrap();

    assert_eq!(engine.backend().frames_presented(), 4);
    assert_eq!(engine.timer().frame_count(), 4);
}

#[test]
fn test_removed_entity_leaves_no_registrations() {
    let mut engine = engine(2);
    let level = engine.scenes_mut().create_scene("level").unwrap();
    let floor = engine.scenes_mut().instance_entity(level, block(0.0, -20.0)).unwrap();
    let player = engine.scenes_mut().instance_entity(level, block(0.0, 0.0)).unwrap();
    engine.scenes_mut().set_current_scene(level).unwrap();
    {
        let (scenes, collisions) = engine.scenes_and_collisions_mut();
        collisions.add_to_group(scenes.entities_mut(), floor, "solid").unwrap();
        collisions.link(scenes.entities(), player, "solid", |_, _| {}).unwrap();
    }

    engine.remove_entity(floor).unwrap();

    assert!(engine.collisions().group_members("solid").unwrap().is_empty());
    engine.start_renderer(&mut noop).unwrap();
    assert_eq!(engine.backend().draws_last_frame(), 1);
}

#[tokio::test]
async fn test_completion_signal_resolves_after_stop() {
    let mut engine = engine(2);
    let early = engine.completion();
    assert!(!early.is_done());

    engine.start_renderer(&mut noop).unwrap();

    early.clone().wait().await;
    assert!(early.is_done());
    assert!(engine.completion().is_done());
}

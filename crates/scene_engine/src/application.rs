//! Application trait and lifecycle management

use crate::engine::{EngineError, FrameContext};
use crate::physics::CollisionError;
use crate::render::RenderError;
use crate::scene::SceneError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with the engine. `update` is the
/// per-frame callback: it runs after entities are drawn and before entity
/// updates, collision and the camera advance, and may mutate any of them
/// through the [`FrameContext`].
///
/// Any `FnMut(&mut FrameContext) -> Result<(), AppError>` closure is an
/// application with no setup or teardown.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized, before the first frame.
    /// Use this to build scenes and register collision groups.
    fn initialize(&mut self, _ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        Ok(())
    }

    /// Per-frame callback
    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the renderer is terminating.
    fn cleanup(&mut self, _ctx: &mut FrameContext<'_>) {}
}

impl<F> Application for F
where
    F: FnMut(&mut FrameContext<'_>) -> Result<(), AppError>,
{
    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Result<(), AppError> {
        self(ctx)
    }
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene lookup or mutation failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Collision registration failed
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    /// Render resource error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Game logic error
    #[error("Game logic error: {0}")]
    GameLogic(String),
}

//! Window and input platforms
//!
//! The engine talks to its surface through [`Platform`]: poll events into
//! the engine-owned [`InputState`], report the close request and the screen
//! size, and tear down on exit. [`HeadlessPlatform`] replays scripted input
//! for tests and offscreen runs; `GlfwPlatform` (feature `glfw-window`)
//! opens a real window.

#[cfg(feature = "glfw-window")]
pub mod desktop;
pub mod headless;

#[cfg(feature = "glfw-window")]
pub use desktop::GlfwPlatform;
pub use headless::HeadlessPlatform;

use crate::input::InputState;
use thiserror::Error;

/// Platform errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The windowing system could not start
    #[error("Platform initialization failed: {0}")]
    InitializationFailed(String),

    /// The window could not be created
    #[error("Window creation failed")]
    CreationFailed,
}

/// Surface and event source driven by the frame scheduler
pub trait Platform {
    /// Pump pending events into the input state
    fn poll(&mut self, input: &mut InputState);

    /// Whether the surface asked to close
    fn should_close(&self) -> bool;

    /// Ask the surface to close after the current frame
    fn request_close(&mut self);

    /// Drawable size in pixels
    fn screen_size(&self) -> (f32, f32);

    /// Tear down the windowing system
    fn shutdown(&mut self) {}
}

//! # Scene Engine
//!
//! A real-time 2D/3D scene-graph renderer core: frame scheduling, scenes of
//! entities with per-instance copies, axis-aligned collision groups with
//! mouse hit-testing, and a camera for either dimension.
//!
//! ## Features
//!
//! - **Frame Scheduler**: fixed per-frame order with a frame-rate floor
//! - **Scenes**: nestable scenes, exclusive scene switching, UI and text
//! - **Copies**: one entity drawn at many positions, culled by render distance
//! - **Collision**: swept rectangle tests reporting the side that touched
//! - **Backend-Agnostic**: drawing goes through a [`render::RenderBackend`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let platform = HeadlessPlatform::new(800.0, 600.0).close_after(60);
//!     let mut engine = Engine::new(config, RecordingBackend::current_frame_only(), platform)?;
//!
//!     let level = engine.scenes_mut().create_scene("level")?;
//!     engine.scenes_mut().set_current_scene(level)?;
//!
//!     let mut app = |ctx: &mut FrameContext<'_>| -> Result<(), AppError> {
//!         log::debug!("frame {} took {:.4}s", ctx.frame, ctx.delta_time);
//!         Ok(())
//!     };
//!     engine.start_renderer(&mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod camera;
pub mod input;
pub mod physics;
pub mod platform;
pub mod render;
pub mod scene;

mod application;
mod engine;

#[cfg(test)]
mod tests;

pub use application::{AppError, Application};
pub use engine::{CompletionSignal, Engine, EngineError, FrameContext, RendererState};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, Application, CompletionSignal, Engine, EngineError, FrameContext, RendererState,
        camera::{Camera, CameraMovement},
        core::config::{Config, Dimension, EngineConfig, MovementPolicy},
        foundation::math::{Mat4, Vec2, Vec3, Vec4},
        input::{InputEvent, InputState, KeyCode, MouseButton},
        physics::{Collider, CollisionControl, CollisionResults, CollisionSide},
        platform::{HeadlessPlatform, Platform},
        render::{
            GeometryHandle, LightingEnvironment, MaterialHandle, RecordingBackend, RenderBackend,
            ResourceRegistry, Skybox, TextureHandle,
        },
        scene::{Entity, EntityCopy, EntityId, SceneControl, SceneId, TextElement, UiElement},
    };
}

//! # Rendering System
//!
//! The core never talks to a graphics API. It decides *when* geometry and
//! materials are bound and drawn, and hands those decisions to a
//! [`RenderBackend`] implementation supplied by the application.
//!
//! ## Architecture
//!
//! - **Backend**: the [`RenderBackend`] trait plus the opaque resource handles
//!   it hands out ([`GeometryHandle`], [`MaterialHandle`], [`TextureHandle`])
//! - **Pass**: [`RenderPass`] walks entities for one frame, picks single or
//!   copy mode and culls copies against the render distance
//! - **Culling**: the per-axis box test shared by rendering and collision
//! - **Lighting**: the [`LightingEnvironment`] uploaded once per frame
//! - **Resources**: name lookup for handles produced by asset loading
//! - **Recording**: a backend that records calls, for tests and headless runs

pub mod backend;
pub mod culling;
pub mod lighting;
pub mod pass;
pub mod recording;
pub mod resources;

pub use backend::{
    FrameTarget, GeometryHandle, MaterialHandle, RenderBackend, Skybox, TextureHandle,
    UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW,
};
pub use culling::within_render_distance;
pub use lighting::{Light, LightType, LightingEnvironment};
pub use pass::{FrameStats, RenderPass};
pub use recording::{RecordingBackend, RenderCommand};
pub use resources::{ResourceKind, ResourceRegistry};

use crate::scene::EntityId;
use thiserror::Error;

/// Errors raised by the rendering layer
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    ///
    /// Window or surface creation and default material compilation happen
    /// before the frame loop starts; failure here aborts startup.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A rendering operation failed during execution
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// A texture was attached to an entity that has no geometry yet
    #[error("Invalid attachment order on entity {entity:?}: texture attached before geometry")]
    InvalidAttachmentOrder {
        /// Offending entity
        entity: EntityId,
    },

    /// An entity reached the render pass without geometry
    #[error("Entity {0:?} has no geometry")]
    MissingGeometry(EntityId),

    /// A named resource lookup failed
    #[error("Unknown {kind}: {name}")]
    UnknownResource {
        /// Kind of resource looked up
        kind: ResourceKind,
        /// Name that was not registered
        name: String,
    },

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

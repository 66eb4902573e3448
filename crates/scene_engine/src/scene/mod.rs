//! Scene graph: entities, copies, scenes and scene control
//!
//! Entities and scenes are addressed by generational handles
//! ([`EntityId`], [`SceneId`]). Every registration elsewhere in the engine
//! (collision groups, links, mouse hit-testing) is keyed by these handles
//! and removed explicitly.

pub mod entity;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod scene_control;
pub mod store;
pub mod ui;

pub use entity::{Entity, EntityCopy};
pub use scene::Scene;
pub use scene_control::SceneControl;
pub use store::EntityStore;
pub use ui::{Button, TextElement, UiElement, UiKind};

use thiserror::Error;

slotmap::new_key_type! {
    /// Stable handle to an entity
    pub struct EntityId;

    /// Stable handle to a scene
    pub struct SceneId;
}

/// Errors raised by scene management
#[derive(Error, Debug)]
pub enum SceneError {
    /// No scene with this name
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// A scene handle that does not resolve
    #[error("Unknown scene handle: {0:?}")]
    UnknownSceneId(SceneId),

    /// A scene with this name already exists
    #[error("Scene already exists: {0}")]
    DuplicateScene(String),

    /// An entity handle that does not resolve
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),

    /// Nesting would create a cycle
    #[error("Nesting scene {child:?} under {parent:?} would create a cycle")]
    CyclicSubscene {
        /// Intended parent
        parent: SceneId,
        /// Intended child
        child: SceneId,
    },

    /// The scene already has a parent
    #[error("Scene {0:?} is already nested in another scene")]
    AlreadyNested(SceneId),
}

//! Physics module for axis-aligned collision detection
//!
//! Rectangles are swept along one axis at a time to report which side of a
//! mover touched an obstacle. [`CollisionControl`] groups entities, links
//! movers to groups and hit-tests the mouse every frame.

pub mod collider;
pub mod collision_control;

pub use collider::{Collider, CollisionResults, CollisionSide};
pub use collision_control::{CollisionControl, LinkCallback, MouseCallback, ScreenSpace};

use crate::scene::EntityId;
use thiserror::Error;

/// Errors raised by collision registration and evaluation
#[derive(Error, Debug)]
pub enum CollisionError {
    /// No group with this name
    #[error("Unknown collision group: {0}")]
    UnknownGroup(String),

    /// A registration refers to an entity that no longer exists
    #[error("Collision registration refers to a removed entity: {0:?}")]
    DanglingEntity(EntityId),

    /// The entity has no collider
    #[error("Entity {0:?} has no collider")]
    MissingCollider(EntityId),
}

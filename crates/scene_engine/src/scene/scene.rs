//! A single scene: an ordered, nestable container of entities, UI and text

use crate::scene::{EntityId, SceneId, TextElement, UiElement};

/// Scene contents and activation state
///
/// Scenes only hold identifiers; the entities themselves live in the
/// [`EntityStore`](crate::scene::EntityStore) owned by
/// [`SceneControl`](crate::scene::SceneControl), which also performs
/// activation so the flag can propagate to entities and subscenes.
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    pub(crate) entities: Vec<EntityId>,
    pub(crate) ui: Vec<UiElement>,
    pub(crate) texts: Vec<TextElement>,
    pub(crate) subscenes: Vec<SceneId>,
    pub(crate) active: bool,
    /// Whether the frame scheduler draws this scene's entities itself
    pub automatic_rendering: bool,
}

impl Scene {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            ui: Vec::new(),
            texts: Vec::new(),
            subscenes: Vec::new(),
            active: false,
            automatic_rendering: true,
        }
    }

    /// Scene name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the scene is active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Entities owned directly by this scene, in insertion order
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// UI elements
    #[must_use]
    pub fn ui(&self) -> &[UiElement] {
        &self.ui
    }

    /// Text elements
    #[must_use]
    pub fn texts(&self) -> &[TextElement] {
        &self.texts
    }

    /// Mutable text elements
    pub fn texts_mut(&mut self) -> &mut [TextElement] {
        &mut self.texts
    }

    /// Nested subscenes
    #[must_use]
    pub fn subscenes(&self) -> &[SceneId] {
        &self.subscenes
    }
}

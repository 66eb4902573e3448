//! UI elements and text owned by scenes
//!
//! A UI element is a group of entities plus a behavior. The only behavior
//! with state is [`Button`], which turns the per-frame mouse-over flag and
//! the left mouse button into a one-shot click.

use crate::foundation::math::{Vec2, Vec4};
use crate::scene::EntityId;

/// Button with a click latch
///
/// The latch fires once when the button is pressed while hovered and
/// re-arms only after the mouse button is released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Button {
    label: String,
    hovered: bool,
    held: bool,
    just_clicked: bool,
}

impl Button {
    /// Create a button with a label
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Label text
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Feed this frame's mouse state; returns whether a click fired
    pub fn update(&mut self, hovered: bool, left_down: bool) -> bool {
        self.hovered = hovered;
        self.just_clicked = hovered && left_down && !self.held;
        self.held = left_down;
        self.just_clicked
    }

    /// Whether the mouse is over the button
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the last update produced a click
    #[must_use]
    pub const fn just_clicked(&self) -> bool {
        self.just_clicked
    }
}

/// Behavior of a UI element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiKind {
    /// Decorative, no input handling
    Panel,
    /// Clickable button
    Button(Button),
}

/// UI element: the entities it renders plus its behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiElement {
    /// Entities drawn for this element
    pub entities: Vec<EntityId>,
    /// Behavior
    pub kind: UiKind,
}

impl UiElement {
    /// Decorative element
    #[must_use]
    pub const fn panel(entities: Vec<EntityId>) -> Self {
        Self { entities, kind: UiKind::Panel }
    }

    /// Button element
    #[must_use]
    pub fn button(label: impl Into<String>, entities: Vec<EntityId>) -> Self {
        Self {
            entities,
            kind: UiKind::Button(Button::new(label)),
        }
    }

    /// The button state, if this element is a button
    #[must_use]
    pub const fn as_button(&self) -> Option<&Button> {
        match &self.kind {
            UiKind::Button(button) => Some(button),
            UiKind::Panel => None,
        }
    }
}

/// Text drawn by the backend's font collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    /// Text content
    pub content: String,
    /// Position (pixels)
    pub position: Vec2,
    /// Glyph scale
    pub scale: f32,
    /// RGBA color
    pub color: Vec4,
    /// Drawn with the static view
    pub is_static: bool,
}

impl TextElement {
    /// Screen-anchored white text
    #[must_use]
    pub fn new(content: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            content: content.into(),
            position: Vec2::new(x, y),
            scale: 1.0,
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            is_static: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_fires_once_per_press() {
        let mut button = Button::new("Start");
        assert!(!button.update(true, false));
        assert!(button.update(true, true));
        assert!(button.just_clicked());
        // Still held: no second click.
        assert!(!button.update(true, true));
        assert!(!button.update(true, false));
        assert!(button.update(true, true));
    }

    #[test]
    fn test_press_outside_then_drag_in_does_not_click() {
        let mut button = Button::new("Start");
        assert!(!button.update(false, true));
        assert!(!button.update(true, true));
        assert!(button.is_hovered());
    }
}

//! Per-frame input snapshot
//!
//! [`InputState`] is owned by the engine, filled by the platform once per
//! frame and handed by reference to the camera, the collision engine and the
//! user callback. Nothing in the crate reads input from globals.

use std::collections::HashSet;

use crate::foundation::math::Vec2;

/// Input state for the current frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f64, f64),
    last_mouse_position: (f64, f64),
    scroll_delta: (f64, f64),
}

impl InputState {
    /// Create an empty input state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll per-frame values before new events are applied
    ///
    /// The previous mouse position becomes the baseline for this frame's
    /// delta and the scroll accumulator is reset. Held keys and buttons
    /// persist until a release event arrives.
    pub fn begin_frame(&mut self) {
        self.last_mouse_position = self.mouse_position;
        self.scroll_delta = (0.0, 0.0);
    }

    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Handle mouse button input
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_down.insert(button);
        } else {
            self.buttons_down.remove(&button);
        }
    }

    /// Handle mouse movement (screen pixels, origin top-left)
    pub fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.mouse_position = (x, y);
    }

    /// Handle scroll wheel input
    pub fn handle_scroll(&mut self, dx: f64, dy: f64) {
        self.scroll_delta.0 += dx;
        self.scroll_delta.1 += dy;
    }

    /// Apply a platform event
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key, pressed) => self.handle_key_input(key, pressed),
            InputEvent::MouseButton(button, pressed) => self.handle_mouse_button(button, pressed),
            InputEvent::MouseMove(x, y) => self.handle_mouse_move(x, y),
            InputEvent::Scroll(dx, dy) => self.handle_scroll(dx, dy),
        }
    }

    /// Whether a key is currently held
    #[must_use]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Whether a mouse button is currently held
    #[must_use]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Current mouse position in screen pixels
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn mouse_position(&self) -> Vec2 {
        Vec2::new(self.mouse_position.0 as f32, self.mouse_position.1 as f32)
    }

    /// Mouse position at the start of this frame
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn last_mouse_position(&self) -> Vec2 {
        Vec2::new(self.last_mouse_position.0 as f32, self.last_mouse_position.1 as f32)
    }

    /// Mouse movement since the previous frame
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_position() - self.last_mouse_position()
    }

    /// Scroll accumulated this frame
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn scroll_delta(&self) -> Vec2 {
        Vec2::new(self.scroll_delta.0 as f32, self.scroll_delta.1 as f32)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Left shift
    LeftShift,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Platform-neutral input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed (`true`) or released (`false`)
    Key(KeyCode, bool),
    /// Mouse button pressed or released
    MouseButton(MouseButton, bool),
    /// Cursor moved to a screen position
    MouseMove(f64, f64),
    /// Scroll wheel offset
    Scroll(f64, f64),
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_keys_persist_until_released() {
        let mut input = InputState::new();
        input.handle_key_input(KeyCode::W, true);
        input.begin_frame();
        assert!(input.is_key_down(KeyCode::W));
        input.handle_key_input(KeyCode::W, false);
        assert!(!input.is_key_down(KeyCode::W));
    }

    #[test]
    fn test_mouse_delta_is_per_frame() {
        let mut input = InputState::new();
        input.handle_mouse_move(10.0, 20.0);
        input.begin_frame();
        input.handle_mouse_move(15.0, 18.0);
        assert_relative_eq!(input.mouse_delta(), Vec2::new(5.0, -2.0));

        input.begin_frame();
        assert_relative_eq!(input.mouse_delta(), Vec2::zeros());
    }

    #[test]
    fn test_scroll_resets_each_frame() {
        let mut input = InputState::new();
        input.handle_scroll(0.0, 1.0);
        input.handle_scroll(0.0, 2.0);
        assert_relative_eq!(input.scroll_delta().y, 3.0);
        input.begin_frame();
        assert_relative_eq!(input.scroll_delta().y, 0.0);
    }

    #[test]
    fn test_apply_routes_events() {
        let mut input = InputState::new();
        input.apply(InputEvent::Key(KeyCode::Space, true));
        input.apply(InputEvent::MouseMove(3.0, 4.0));
        assert!(input.is_key_down(KeyCode::Space));
        assert_relative_eq!(input.mouse_position(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_mouse_buttons() {
        let mut input = InputState::new();
        input.handle_mouse_button(MouseButton::Left, true);
        assert!(input.is_mouse_down(MouseButton::Left));
        assert!(!input.is_mouse_down(MouseButton::Right));
    }
}

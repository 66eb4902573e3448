//! Window management using GLFW

use crate::core::config::WindowConfig;
use crate::input::{InputEvent, InputState, KeyCode, MouseButton};
use crate::platform::{Platform, PlatformError};

/// GLFW window with key, cursor, button and scroll polling
pub struct GlfwPlatform {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    size: (f32, f32),
}

impl GlfwPlatform {
    /// Open a window; rendering is left to the backend, so no client API
    /// context is created
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| PlatformError::InitializationFailed(format!("{e:?}")))?;

        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(PlatformError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_mouse_button_polling(true);
        window.set_scroll_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        log::info!("Window '{}' opened at {}x{}", config.title, config.width, config.height);
        #[allow(clippy::cast_precision_loss)]
        let size = (config.width as f32, config.height as f32);
        Ok(Self {
            glfw,
            window,
            events,
            size,
        })
    }
}

impl Platform for GlfwPlatform {
    fn poll(&mut self, input: &mut InputState) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    #[allow(clippy::cast_precision_loss)]
                    let size = (width as f32, height as f32);
                    self.size = size;
                }
                glfw::WindowEvent::Close => self.window.set_should_close(true),
                other => {
                    if let Some(event) = translate(&other) {
                        input.apply(event);
                    }
                }
            }
        }
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn request_close(&mut self) {
        self.window.set_should_close(true);
    }

    fn screen_size(&self) -> (f32, f32) {
        self.size
    }

    fn shutdown(&mut self) {
        self.window.hide();
        log::info!("Window closed");
    }
}

fn translate(event: &glfw::WindowEvent) -> Option<InputEvent> {
    match *event {
        glfw::WindowEvent::Key(key, _, action, _) => {
            let pressed = match action {
                glfw::Action::Press => true,
                glfw::Action::Release => false,
                glfw::Action::Repeat => return None,
            };
            map_key(key).map(|key| InputEvent::Key(key, pressed))
        }
        glfw::WindowEvent::MouseButton(button, action, _) => {
            let button = match button {
                glfw::MouseButton::Button1 => MouseButton::Left,
                glfw::MouseButton::Button2 => MouseButton::Right,
                glfw::MouseButton::Button3 => MouseButton::Middle,
                _ => return None,
            };
            Some(InputEvent::MouseButton(button, action != glfw::Action::Release))
        }
        glfw::WindowEvent::CursorPos(x, y) => Some(InputEvent::MouseMove(x, y)),
        glfw::WindowEvent::Scroll(dx, dy) => Some(InputEvent::Scroll(dx, dy)),
        _ => None,
    }
}

const fn map_key(key: glfw::Key) -> Option<KeyCode> {
    use glfw::Key;
    Some(match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::LeftShift => KeyCode::LeftShift,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        _ => return None,
    })
}

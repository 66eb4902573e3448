//! Platformer demo for the scene engine
//!
//! Runs headless with a scripted play-through by default. Build with
//! `--features window` to play in a GLFW window instead.

mod logging_backend;
mod platformer;

use logging_backend::LoggingBackend;
use platformer::Platformer;
use scene_engine::prelude::*;

const CONFIG_PATH: &str = "demo_app/config/engine.toml";
const COIN_SEED: u64 = 7;
const COIN_COUNT: usize = 12;

fn resources() -> ResourceRegistry {
    let mut resources = ResourceRegistry::new();
    resources.register_geometry("quad", GeometryHandle::new(1, 6));
    resources.register_material("button", MaterialHandle(1));
    resources.register_material("ground", MaterialHandle(2));
    resources.register_material("player", MaterialHandle(3));
    resources.register_material("coin", MaterialHandle(4));
    resources
}

#[cfg(not(feature = "window"))]
fn platform(config: &EngineConfig) -> Result<HeadlessPlatform, Box<dyn std::error::Error>> {
    let (w, h) = config.screen_size();
    // Click Start, walk right, jump once, then leave
    let platform = HeadlessPlatform::new(w, h)
        .close_after(600)
        .with_event(2, InputEvent::MouseMove(f64::from(w / 2.0), f64::from(h / 2.0)))
        .with_event(3, InputEvent::MouseButton(MouseButton::Left, true))
        .with_event(5, InputEvent::MouseButton(MouseButton::Left, false))
        .with_event(10, InputEvent::Key(KeyCode::D, true))
        .with_event(60, InputEvent::Key(KeyCode::Space, true))
        .with_event(62, InputEvent::Key(KeyCode::Space, false))
        .with_event(240, InputEvent::Key(KeyCode::D, false))
        .with_event(300, InputEvent::Key(KeyCode::Escape, true));
    Ok(platform)
}

#[cfg(feature = "window")]
fn platform(config: &EngineConfig) -> Result<scene_engine::platform::GlfwPlatform, Box<dyn std::error::Error>> {
    Ok(scene_engine::platform::GlfwPlatform::new(&config.window)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load_or_default(CONFIG_PATH)?;

    let platform = platform(&config)?;
    let mut engine = Engine::new(config, LoggingBackend::new(60), platform)?;
    log::info!("Starting platformer demo");

    let mut game = Platformer::new(resources(), COIN_SEED, COIN_COUNT);
    let result = engine.start_renderer(&mut game);

    match result {
        Ok(()) => {
            log::info!(
                "Demo completed after {} frames with score {}",
                engine.backend().frames_presented(),
                game.score()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Demo failed: {:?}", e);
            Err(e.into())
        }
    }
}

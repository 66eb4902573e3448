//! Engine-level tests driving whole frames through the recording backend
//! and the headless platform

mod frame_loop;
mod lifecycle;

use crate::core::config::{Dimension, EngineConfig};
use crate::engine::Engine;
use crate::physics::Collider;
use crate::platform::HeadlessPlatform;
use crate::render::{GeometryHandle, MaterialHandle, RecordingBackend};
use crate::scene::Entity;

type TestEngine = Engine<RecordingBackend, HeadlessPlatform>;

fn config() -> EngineConfig {
    EngineConfig::default()
        .with_window_size(800, 600)
        .with_max_fps(Some(1000))
        .with_render_distance(1000.0)
}

fn engine_with(config: EngineConfig, platform: HeadlessPlatform) -> TestEngine {
    Engine::new(config, RecordingBackend::new(), platform).unwrap()
}

fn engine(frames: u64) -> TestEngine {
    engine_with(config(), HeadlessPlatform::new(800.0, 600.0).close_after(frames))
}

fn block(x: f32, y: f32) -> Entity {
    Entity::new(Dimension::TwoD, MaterialHandle(1))
        .with_geometry(GeometryHandle::new(1, 6))
        .with_position(x, y, 0.0)
        .with_collider(Collider::sized(10.0, 10.0))
}

//! Core engine types
//!
//! Houses the configuration model shared by every subsystem.

pub mod config;

pub use config::{
    CameraConfig, CollisionConfig, Dimension, EngineConfig, MovementPolicy, RendererConfig,
    WindowConfig,
};

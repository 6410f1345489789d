//! Drift Particles - parameterized 2D particle fields
//!
//! One simulator covers every visual variant through its config:
//! - Ambient populations sized by container area, with drift, depth and links
//! - Impulse bursts of transient sparks, droplets and confetti with ripple waves
//! - Swap-remove particle pool capped at `max_entities`
//! - Rendering through the `DrawSurface` trait (recording or raster backends)
//! - `FieldSystem`, the `RuntimeSystem` that routes host events to fields

pub mod config;
pub mod curves;
pub mod field;
pub mod particle;
pub mod presets;
pub mod rand;
pub mod render;
pub mod surface;
pub mod system;

pub use config::{
    AmbientConfig, Binding, BurstConfig, BurstOrigin, DepthConfig, DriftConfig, FieldConfig,
    Launch, LinkConfig, PointerForce, WaveConfig, DEFAULT_MAX_ENTITIES,
};
pub use field::{FieldSnapshot, FieldState, ParticleField};
pub use particle::{Boundary, Particle, ParticleKind, ParticlePool, Wave};
pub use presets::Preset;
pub use surface::{DrawCommand, DrawCounts, DrawSurface, RadialGradient, RecordingSurface};
pub use system::{FieldSlot, FieldSystem};

//! CLI command implementations

pub mod presets;
pub mod render;
pub mod simulate;
pub mod validate;

//! Scene files: a set of named fields laid out on a host page

use anyhow::{Context, Result};
use drift_particles::{FieldConfig, Preset};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted field width or height, in pixels
pub const MAX_FIELD_SIZE: f32 = 8192.0;

fn default_tick_rate() -> f64 {
    60.0
}

/// A scene file as written on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Base RNG seed; field `i` uses `seed + i`. Entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fixed ticks per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Fraction of the remaining distance the pointer eases per frame, in (0, 1].
    /// The raw pointer is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_smoothing: Option<f32>,
    #[serde(default, rename = "field")]
    pub fields: Vec<SceneField>,
}

/// One field entry in a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneField {
    pub name: String,
    pub preset: String,
    pub width: f32,
    pub height: f32,
    /// Top-left corner of the container in page coordinates
    #[serde(default)]
    pub origin: [f32; 2],
    /// Config keys replacing the preset's values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<toml::Table>,
}

impl Scene {
    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read scene file: {}", path))?;
        Self::parse(&text).with_context(|| format!("Invalid scene file: {}", path))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let scene: Scene = toml::from_str(text).context("Failed to parse scene TOML")?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check scene-level settings and every field's name and size
    pub fn validate(&self) -> Result<()> {
        if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
            anyhow::bail!("tick_rate must be positive, got {}", self.tick_rate);
        }
        if let Some(factor) = self.pointer_smoothing {
            if !(factor > 0.0 && factor <= 1.0) {
                anyhow::bail!("pointer_smoothing must be in (0, 1], got {}", factor);
            }
        }
        let mut names = std::collections::HashSet::new();
        for field in &self.fields {
            field.validate()?;
            if !names.insert(field.name.as_str()) {
                anyhow::bail!("duplicate field name '{}'", field.name);
            }
        }
        Ok(())
    }

    /// A one-field scene for a bare preset
    pub fn single(preset: &str, width: f32, height: f32) -> Self {
        Self {
            seed: None,
            tick_rate: default_tick_rate(),
            pointer_smoothing: None,
            fields: vec![SceneField {
                name: preset.to_string(),
                preset: preset.to_string(),
                width,
                height,
                origin: [0.0, 0.0],
                overrides: None,
            }],
        }
    }
}

impl SceneField {
    /// Names become part of output file names; sizes are bounded
    pub fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        if name.is_empty()
            || name.contains(['/', '\\', '\0'])
            || name == "."
            || name.contains("..")
        {
            anyhow::bail!("invalid field name '{}'", self.name);
        }
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && (0.0..=MAX_FIELD_SIZE).contains(&value)) {
                anyhow::bail!(
                    "field '{}' {} must be within 0..={}, got {}",
                    self.name,
                    axis,
                    MAX_FIELD_SIZE,
                    value
                );
            }
        }
        Ok(())
    }

    /// The preset config with this entry's overrides merged in, validated
    pub fn config(&self) -> Result<FieldConfig> {
        let preset: Preset = self.preset.parse()?;
        let mut config = preset.config();

        if let Some(overrides) = &self.overrides {
            let mut value = toml::Value::try_from(&config)
                .context("Failed to serialize preset config")?;
            merge(&mut value, toml::Value::Table(overrides.clone()));
            config = value
                .try_into()
                .with_context(|| format!("Invalid overrides for field '{}'", self.name))?;
        }

        config
            .validate()
            .with_context(|| format!("Invalid config for field '{}'", self.name))?;
        Ok(config)
    }
}

/// Deep-merge `patch` into `base`: tables merge key by key, anything else replaces
fn merge(base: &mut toml::Value, patch: toml::Value) {
    match (base, patch) {
        (toml::Value::Table(base), toml::Value::Table(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

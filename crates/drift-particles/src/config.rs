//! Field configuration: the capability set and tuning constants of one simulator

use crate::particle::{Boundary, ParticleKind};
use drift_core::{Color, DriftError, Result};
use serde::{Deserialize, Serialize};

/// Default cap on live particles per field
pub const DEFAULT_MAX_ENTITIES: usize = 1500;

/// Hard ceiling accepted by validation
pub const MAX_ENTITIES_LIMIT: usize = 100_000;

/// Everything a [`crate::ParticleField`] needs to know at construction.
///
/// Each optional section switches one capability on: an ambient population,
/// sinusoidal drift, pointer force, a depth axis, connection lines, impulse
/// bursts and ripple waves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Cap on live particles; spawns past it are dropped
    pub max_entities: usize,
    pub ambient: Option<AmbientConfig>,
    pub drift: Option<DriftConfig>,
    pub pointer: Option<PointerForce>,
    pub depth: Option<DepthConfig>,
    pub links: Option<LinkConfig>,
    pub bursts: Vec<BurstConfig>,
    pub wave: Option<WaveConfig>,
    pub binding: Binding,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            ambient: None,
            drift: None,
            pointer: None,
            depth: None,
            links: None,
            bursts: Vec::new(),
            wave: None,
            binding: Binding::default(),
        }
    }
}

/// Persistent population sized by container area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Area per entity: population is `floor(width * height / density)`
    pub density: f32,
    /// Initial velocity per axis is uniform in `[-speed/2, speed/2)`
    pub speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub palette: Vec<Color>,
    /// Velocity multiplier per tick (1.0 = no damping)
    pub damping: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            density: 15000.0,
            speed: 0.5,
            radius_min: 1.0,
            radius_max: 3.0,
            palette: vec![Color::rgba(0, 217, 255, 0.6), Color::rgba(123, 47, 255, 0.6)],
            damping: 0.99,
        }
    }
}

/// Sinusoidal sideways drift with pulsing alpha for ambient motes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Phase advance per tick, in radians
    pub phase_step: f32,
    /// Horizontal displacement per tick at the crest of the wave
    pub amplitude: f32,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            phase_step: 0.02,
            amplitude: 0.3,
        }
    }
}

/// Push applied to entities near the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerForce {
    /// No effect at or beyond this distance
    pub radius: f32,
    /// Velocity change per tick at zero distance
    pub strength: f32,
}

impl Default for PointerForce {
    fn default() -> Self {
        Self {
            radius: 100.0,
            strength: 0.2,
        }
    }
}

/// Third axis with perspective scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Depth range is `[0, max_depth]`
    pub max_depth: f32,
    /// Initial depth velocity is uniform in `[-speed/2, speed/2)`
    pub speed: f32,
    /// Links need a depth difference below this
    pub link_depth: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            max_depth: 100.0,
            speed: 0.2,
            link_depth: 30.0,
        }
    }
}

/// Lines between nearby entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub distance: f32,
    /// Line alpha at zero distance
    pub alpha: f32,
    pub width: f32,
    pub color: Color,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            distance: 120.0,
            alpha: 0.2,
            width: 1.0,
            color: Color::rgba(0, 217, 255, 1.0),
        }
    }
}

/// Where a burst's particles start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BurstOrigin {
    /// At the impulse point
    Impulse,
    /// Uniformly along the top edge, `offset` above it
    TopEdge { offset: f32 },
}

/// Initial velocity distribution of a burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Launch {
    /// Uniform direction, speed in `[speed_min, speed_max)`
    Radial { speed_min: f32, speed_max: f32 },
    /// Independent uniform ranges per axis
    Scatter {
        vx_min: f32,
        vx_max: f32,
        vy_min: f32,
        vy_max: f32,
    },
}

/// One fixed-size batch of transient particles created per impulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstConfig {
    pub kind: ParticleKind,
    pub count: u32,
    pub origin: BurstOrigin,
    pub launch: Launch,
    pub size_min: f32,
    pub size_max: f32,
    /// Life lost per tick, uniform in `[decay_min, decay_max)`
    pub decay_min: f32,
    pub decay_max: f32,
    #[serde(default)]
    pub gravity: f32,
    #[serde(default = "one")]
    pub damping: f32,
    #[serde(default)]
    pub boundary: Boundary,
    pub palette: Vec<Color>,
}

fn one() -> f32 {
    1.0
}

/// Expanding ripple created once per impulse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Radius gained per tick
    pub growth: f32,
    /// Max radius as a fraction of `min(width, height)`
    pub max_fraction: f32,
    /// Stroke width at full alpha
    pub thickness: f32,
    pub color: Color,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            growth: 2.0,
            max_fraction: 0.6,
            thickness: 3.0,
            color: Color::rgba(0, 217, 255, 0.8),
        }
    }
}

/// How a host maps pointer and lifecycle events onto the field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    /// Start as soon as the field is registered
    pub autostart: bool,
    /// Re-inject every N ticks while the pointer moves inside (0 = never)
    pub retrigger_ticks: u32,
    /// `stop()` when the pointer leaves the container
    pub stop_on_leave: bool,
    /// `clear()` when the pointer leaves the container
    pub clear_on_leave: bool,
}

impl FieldConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FieldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// True if the field keeps a persistent population and never drains
    pub fn has_ambient(&self) -> bool {
        self.ambient.is_some()
    }

    /// True if impulses create anything
    pub fn has_impulse(&self) -> bool {
        self.wave.is_some() || self.bursts.iter().any(|b| b.count > 0)
    }

    /// Particles added by one impulse (before the entity cap)
    pub fn impulse_batch_size(&self) -> usize {
        self.bursts.iter().map(|b| b.count as usize).sum()
    }

    /// Check every numeric constant against its usable range
    pub fn validate(&self) -> Result<()> {
        if self.max_entities == 0 || self.max_entities > MAX_ENTITIES_LIMIT {
            return Err(DriftError::out_of_range(
                "max_entities",
                1.0,
                MAX_ENTITIES_LIMIT as f64,
                self.max_entities as f64,
            ));
        }

        if let Some(ambient) = &self.ambient {
            positive("ambient.density", ambient.density)?;
            non_negative("ambient.speed", ambient.speed)?;
            size_range("ambient.radius", ambient.radius_min, ambient.radius_max)?;
            unit("ambient.damping", ambient.damping)?;
            if ambient.palette.is_empty() {
                return Err(DriftError::InvalidConfig(
                    "ambient.palette must name at least one color".into(),
                ));
            }
        }

        if let Some(drift) = &self.drift {
            if self.ambient.is_none() {
                return Err(DriftError::InvalidConfig(
                    "drift needs an ambient population".into(),
                ));
            }
            non_negative("drift.phase_step", drift.phase_step)?;
            non_negative("drift.amplitude", drift.amplitude)?;
        }

        if let Some(pointer) = &self.pointer {
            positive("pointer.radius", pointer.radius)?;
            non_negative("pointer.strength", pointer.strength)?;
        }

        if let Some(depth) = &self.depth {
            positive("depth.max_depth", depth.max_depth)?;
            non_negative("depth.speed", depth.speed)?;
            non_negative("depth.link_depth", depth.link_depth)?;
        }

        if let Some(links) = &self.links {
            positive("links.distance", links.distance)?;
            unit("links.alpha", links.alpha)?;
            non_negative("links.width", links.width)?;
        }

        for (i, burst) in self.bursts.iter().enumerate() {
            let name = |field: &str| format!("bursts[{i}].{field}");
            size_range(&name("size"), burst.size_min, burst.size_max)?;
            if !(burst.decay_min > 0.0 && burst.decay_min <= burst.decay_max && burst.decay_max <= 1.0)
            {
                return Err(DriftError::InvalidConfig(format!(
                    "{} must satisfy 0 < decay_min <= decay_max <= 1",
                    name("decay")
                )));
            }
            unit(&name("damping"), burst.damping)?;
            if burst.kind.is_persistent() {
                return Err(DriftError::InvalidConfig(format!(
                    "{} must be a transient kind",
                    name("kind")
                )));
            }
            if burst.palette.is_empty() {
                return Err(DriftError::InvalidConfig(format!(
                    "{} must name at least one color",
                    name("palette")
                )));
            }
            match burst.launch {
                Launch::Radial {
                    speed_min,
                    speed_max,
                } => ordered(&name("launch.speed"), speed_min, speed_max)?,
                Launch::Scatter {
                    vx_min,
                    vx_max,
                    vy_min,
                    vy_max,
                } => {
                    ordered(&name("launch.vx"), vx_min, vx_max)?;
                    ordered(&name("launch.vy"), vy_min, vy_max)?;
                }
            }
        }

        if let Some(wave) = &self.wave {
            positive("wave.growth", wave.growth)?;
            if !(wave.max_fraction > 0.0 && wave.max_fraction <= 1.0) {
                return Err(DriftError::out_of_range(
                    "wave.max_fraction",
                    0.0,
                    1.0,
                    wave.max_fraction as f64,
                ));
            }
            non_negative("wave.thickness", wave.thickness)?;
        }

        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DriftError::out_of_range(field, 0.0, f32::MAX as f64, value as f64))
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DriftError::out_of_range(field, 0.0, f32::MAX as f64, value as f64))
    }
}

fn unit(field: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DriftError::out_of_range(field, 0.0, 1.0, value as f64))
    }
}

fn size_range(field: &str, min: f32, max: f32) -> Result<()> {
    positive(&format!("{field}_min"), min)?;
    if max < min {
        return Err(DriftError::InvalidConfig(format!(
            "{field}_max ({max}) is below {field}_min ({min})"
        )));
    }
    Ok(())
}

fn ordered(field: &str, min: f32, max: f32) -> Result<()> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(DriftError::InvalidConfig(format!(
            "{field} range is empty ({min} > {max})"
        )))
    }
}

//! Built-in field presets

use crate::config::{
    AmbientConfig, Binding, BurstConfig, BurstOrigin, DepthConfig, DriftConfig, FieldConfig,
    Launch, LinkConfig, PointerForce, WaveConfig,
};
use crate::particle::{Boundary, ParticleKind};
use drift_core::{Color, DriftError, Result};
use std::fmt;
use std::str::FromStr;

/// The visual variants the simulator ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Ambient,
    Depth,
    Floating,
    Water,
    Confetti,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Ambient,
        Preset::Depth,
        Preset::Floating,
        Preset::Water,
        Preset::Confetti,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Ambient => "ambient",
            Preset::Depth => "depth",
            Preset::Floating => "floating",
            Preset::Water => "water",
            Preset::Confetti => "confetti",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Ambient => "hero background: linked motes pushed away by the pointer",
            Preset::Depth => "card hover: motes with perspective depth and depth-gated links",
            Preset::Floating => "slow drifting motes with pulsing alpha",
            Preset::Water => "hover ripple: splash sparks, falling droplets and a wave ring",
            Preset::Confetti => "celebration burst falling from the top edge",
        }
    }

    /// Config for this preset
    pub fn config(self) -> FieldConfig {
        match self {
            Preset::Ambient => ambient(),
            Preset::Depth => depth(),
            Preset::Floating => floating(),
            Preset::Water => water(),
            Preset::Confetti => confetti(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| DriftError::UnknownPreset {
                name: s.to_string(),
                allowed: Preset::ALL.iter().map(|p| p.name().to_string()).collect(),
            })
    }
}

fn cyan(alpha: f32) -> Color {
    Color::rgba(0, 217, 255, alpha)
}

fn violet(alpha: f32) -> Color {
    Color::rgba(123, 47, 255, alpha)
}

fn ambient() -> FieldConfig {
    FieldConfig {
        ambient: Some(AmbientConfig::default()),
        pointer: Some(PointerForce::default()),
        links: Some(LinkConfig::default()),
        binding: Binding {
            autostart: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn depth() -> FieldConfig {
    FieldConfig {
        ambient: Some(AmbientConfig {
            density: 12000.0,
            ..Default::default()
        }),
        pointer: Some(PointerForce {
            radius: 150.0,
            strength: 0.2,
        }),
        depth: Some(DepthConfig::default()),
        links: Some(LinkConfig::default()),
        binding: Binding {
            stop_on_leave: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn floating() -> FieldConfig {
    FieldConfig {
        ambient: Some(AmbientConfig {
            density: 15000.0,
            speed: 0.3,
            radius_min: 1.0,
            radius_max: 4.0,
            palette: vec![cyan(0.5), violet(0.5)],
            damping: 1.0,
        }),
        drift: Some(DriftConfig::default()),
        binding: Binding {
            autostart: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn water() -> FieldConfig {
    FieldConfig {
        bursts: vec![
            BurstConfig {
                kind: ParticleKind::Spark,
                count: 30,
                origin: BurstOrigin::Impulse,
                launch: Launch::Radial {
                    speed_min: 1.0,
                    speed_max: 4.0,
                },
                size_min: 2.0,
                size_max: 5.0,
                decay_min: 0.02,
                decay_max: 0.02,
                gravity: 0.0,
                damping: 0.98,
                boundary: Boundary::Reflect,
                palette: vec![cyan(0.8), Color::rgba(120, 230, 255, 0.8)],
            },
            BurstConfig {
                kind: ParticleKind::Droplet,
                count: 15,
                origin: BurstOrigin::Impulse,
                launch: Launch::Scatter {
                    vx_min: -2.0,
                    vx_max: 2.0,
                    vy_min: -6.0,
                    vy_max: -2.0,
                },
                size_min: 1.0,
                size_max: 3.0,
                decay_min: 0.01,
                decay_max: 0.01,
                gravity: 0.2,
                damping: 1.0,
                boundary: Boundary::FallThrough,
                palette: vec![Color::rgba(123, 200, 255, 0.9)],
            },
        ],
        wave: Some(WaveConfig::default()),
        binding: Binding {
            retrigger_ticks: 10,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn confetti() -> FieldConfig {
    FieldConfig {
        bursts: vec![BurstConfig {
            kind: ParticleKind::Confetti,
            count: 80,
            origin: BurstOrigin::TopEdge { offset: 20.0 },
            launch: Launch::Scatter {
                vx_min: -3.0,
                vx_max: 3.0,
                vy_min: 2.0,
                vy_max: 5.0,
            },
            size_min: 6.0,
            size_max: 6.0,
            // 2-5 second fall at 60 ticks per second
            decay_min: 1.0 / 300.0,
            decay_max: 1.0 / 120.0,
            gravity: 0.05,
            damping: 1.0,
            boundary: Boundary::FallThrough,
            palette: vec![
                Color::from_hex(0x00D9FF),
                Color::from_hex(0x7B2FFF),
                Color::from_hex(0xFF006E),
                Color::from_hex(0x00FFA3),
                Color::from_hex(0xFFD600),
            ],
        }],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        for preset in Preset::ALL {
            preset.config().validate().unwrap();
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn unknown_preset_lists_choices() {
        let err = "lava".parse::<Preset>().unwrap_err();
        match err {
            DriftError::UnknownPreset { name, allowed } => {
                assert_eq!(name, "lava");
                assert_eq!(allowed.len(), Preset::ALL.len());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn water_batch_is_thirty_sparks_fifteen_droplets() {
        let config = Preset::Water.config();
        assert_eq!(config.bursts[0].count, 30);
        assert_eq!(config.bursts[1].count, 15);
        assert_eq!(config.impulse_batch_size(), 45);
        assert!(config.wave.is_some());
        assert!(!config.has_ambient());
    }

    #[test]
    fn presets_survive_toml() {
        for preset in Preset::ALL {
            let text = preset.config().to_toml_string().unwrap();
            let back = FieldConfig::from_toml_str(&text).unwrap();
            assert_eq!(back.bursts.len(), preset.config().bursts.len());
            assert_eq!(back.has_ambient(), preset.config().has_ambient());
        }
    }
}

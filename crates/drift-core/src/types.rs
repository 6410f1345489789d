//! Common value types

use crate::error::DriftError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA color, channels in [0, 1]
///
/// Serialized as a CSS-style string: `#RRGGBB`, `#RRGGBBAA`,
/// `rgb(r, g, b)` or `rgba(r, g, b, a)` with 0-255 channels and 0-1 alpha.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 0-255 channels and a 0-1 alpha, like CSS `rgba()`
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same RGB with a replaced alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Same RGB with alpha multiplied by `factor`, clamped to [0, 1]
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantize to 8-bit RGBA
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        if (self.a - 1.0).abs() < f32::EPSILON {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "rgba({r}, {g}, {b}, {})", self.a)
        }
    }
}

impl FromStr for Color {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || DriftError::InvalidConfig(format!("unrecognized color '{s}'"));

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(bad());
            }
            let value = u32::from_str_radix(hex, 16).map_err(|_| bad())?;
            return match hex.len() {
                6 => Ok(Self::from_hex(value)),
                8 => Ok(Self::from_hex(value >> 8).with_alpha((value & 0xFF) as f32 / 255.0)),
                _ => Err(bad()),
            };
        }

        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')').ok_or_else(bad)?, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest.strip_suffix(')').ok_or_else(bad)?, false)
        } else {
            return Err(bad());
        };

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            return Err(bad());
        }
        let channel = |p: &str| p.parse::<u8>().map_err(|_| bad());
        let alpha = if has_alpha {
            parts[3].parse::<f32>().map_err(|_| bad())?
        } else {
            1.0
        };
        if !(0.0..=1.0).contains(&alpha) {
            return Err(bad());
        }
        Ok(Self::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

impl TryFrom<String> for Color {
    type Error = DriftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn parse_css_forms() {
        let cyan: Color = "rgba(0, 217, 255, 0.6)".parse().unwrap();
        assert_eq!(cyan.to_rgba8()[..3], [0, 217, 255]);
        assert!((cyan.a - 0.6).abs() < 1e-6);

        let violet: Color = "#7B2FFF".parse().unwrap();
        assert_eq!(violet.to_rgba8(), [0x7B, 0x2F, 0xFF, 255]);

        let half: Color = "#FFFFFF80".parse().unwrap();
        assert!((half.a - 128.0 / 255.0).abs() < 1e-6);

        assert!("rgba(1, 2, 3)".parse::<Color>().is_err());
        assert!("hsl(0, 0%, 0%)".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn hex_accepts_only_hex_digits() {
        assert!("#+FFFFF".parse::<Color>().is_err());
        assert!("#-0000001".parse::<Color>().is_err());
        assert!("# FFFFF".parse::<Color>().is_err());
        assert_eq!("#00ffa3".parse::<Color>().unwrap().to_rgba8(), [0x00, 0xFF, 0xA3, 255]);
    }

    #[test]
    fn display_reparses() {
        let c = Color::rgba(255, 0, 110, 0.25);
        let back: Color = c.to_string().parse().unwrap();
        assert_eq!(back.to_rgba8(), c.to_rgba8());
        assert_eq!(Color::from_hex(0x00FFA3).to_string(), "#00FFA3");
    }

    #[test]
    fn fade_clamps() {
        let c = Color::WHITE.with_alpha(0.6).fade(2.0);
        assert_eq!(c.a, 1.0);
        let c = Color::WHITE.fade(-1.0);
        assert_eq!(c.a, 0.0);
    }

    #[test]
    fn serde_uses_css_strings() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            color: Color,
        }
        let h: Holder = toml::from_str("color = \"#00D9FF\"").unwrap();
        assert_eq!(h.color, Color::from_hex(0x00D9FF));
        let out = toml::to_string(&h).unwrap();
        assert!(out.contains("#00D9FF"));
    }
}

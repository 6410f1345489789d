//! Drift Raster - CPU rasterization of particle fields
//!
//! `RasterSurface` implements `DrawSurface` over an `image::RgbaImage` with
//! straight-alpha source-over blending and one pixel of edge smoothing, so a
//! headless host can save any frame as a PNG.

use drift_core::{Color, DriftError, Result};
use drift_particles::{DrawSurface, RadialGradient};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Software drawing surface
pub struct RasterSurface {
    image: RgbaImage,
    /// Color `clear_rect` fills with; transparent when unset
    background: Option<Color>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            background: None,
        }
    }

    /// Surface whose cleared areas are filled with an opaque backdrop
    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        let mut surface = Self {
            image: RgbaImage::new(width, height),
            background: Some(background),
        };
        surface.clear_rect(0.0, 0.0, width as f32, height as f32);
        surface
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color at a pixel, or None outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).map(|p| to_color(*p))
    }

    /// Write the current frame as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if self.image.width() == 0 || self.image.height() == 0 {
            return Err(DriftError::Surface(format!(
                "cannot save an empty {}x{} frame",
                self.image.width(),
                self.image.height()
            )));
        }
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| DriftError::Surface(format!("Failed to save PNG {}: {e}", path.display())))?;
        log::debug!("[raster] saved {}x{} frame to {}", self.width(), self.height(), path.display());
        Ok(())
    }

    /// Blend `color` into one pixel with the given coverage
    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let src_a = color.a * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let dst = to_color(*pixel);

        let out_a = src_a + dst.a * (1.0 - src_a);
        let mix = |s: f32, d: f32| (s * src_a + d * dst.a * (1.0 - src_a)) / out_a;
        *pixel = to_rgba(Color::new(
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
            out_a,
        ));
    }

    /// Visit every pixel whose center lies in the box around `center`
    fn for_each_in_box(&mut self, center: Vec2, extent: Vec2, mut f: impl FnMut(&mut Self, i64, i64, Vec2)) {
        let min = (center - extent).floor();
        let max = (center + extent).ceil();
        let x0 = (min.x as i64).max(0);
        let y0 = (min.y as i64).max(0);
        let x1 = (max.x as i64).min(self.image.width() as i64 - 1);
        let y1 = (max.y as i64).min(self.image.height() as i64 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                f(self, x, y, p);
            }
        }
    }
}

/// Fraction of a pixel covered by a shape edge `distance` pixels inside it
fn edge_coverage(distance: f32) -> f32 {
    (distance + 0.5).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn to_color(p: Rgba<u8>) -> Color {
    let [r, g, b, a] = p.0;
    Color::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    )
}

fn to_rgba(c: Color) -> Rgba<u8> {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([q(c.r), q(c.g), q(c.b), q(c.a)])
}

impl DrawSurface for RasterSurface {
    fn resize(&mut self, width: u32, height: u32) {
        if width == self.image.width() && height == self.image.height() {
            return;
        }
        self.image = RgbaImage::new(width, height);
        if self.background.is_some() {
            self.clear_rect(0.0, 0.0, width as f32, height as f32);
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let fill = to_rgba(self.background.unwrap_or(Color::TRANSPARENT));
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + width).max(0.0).ceil() as u32).min(self.image.width());
        let y1 = ((y + height).max(0.0).ceil() as u32).min(self.image.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, fill);
            }
        }
    }

    fn fill_radial_circle(&mut self, center: Vec2, radius: f32, gradient: RadialGradient) {
        if radius <= 0.0 {
            return;
        }
        self.for_each_in_box(center, Vec2::splat(radius + 1.0), |surface, x, y, p| {
            let d = p.distance(center);
            let coverage = edge_coverage(radius - d);
            if coverage > 0.0 {
                surface.blend(x, y, gradient.sample(d / radius), coverage);
            }
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        if width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let center = (from + to) * 0.5;
        let extent = (to - from).abs() * 0.5 + Vec2::splat(half + 1.0);
        self.for_each_in_box(center, extent, |surface, x, y, p| {
            let coverage = edge_coverage(half - distance_to_segment(p, from, to));
            if coverage > 0.0 {
                surface.blend(x, y, color, coverage);
            }
        });
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color, width: f32) {
        if width <= 0.0 || radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        let half = width * 0.5;
        self.for_each_in_box(center, radii + Vec2::splat(half + 1.0), |surface, x, y, p| {
            let offset = p - center;
            let k = (offset / radii).length();
            if k <= f32::EPSILON {
                return;
            }
            // Radial distance from the outline along the ray through p
            let d = offset.length();
            let edge = (d - d / k).abs();
            let coverage = edge_coverage(half - edge);
            if coverage > 0.0 {
                surface.blend(x, y, color, coverage);
            }
        });
    }
}

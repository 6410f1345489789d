//! Render pass: turns live entities into draw calls

use crate::config::{DepthConfig, FieldConfig, LinkConfig};
use crate::curves::{lerp_f32, perspective_scale, proximity, pulse};
use crate::particle::{Particle, Wave};
use crate::surface::{DrawSurface, RadialGradient};
use glam::Vec2;

/// Draw one frame: clear, discs, links, wave rings.
///
/// Nothing is drawn for a zero-area surface.
pub fn draw_frame<S: DrawSurface>(
    surface: &mut S,
    size: Vec2,
    config: &FieldConfig,
    particles: &[Particle],
    waves: &[Wave],
    reduced_motion: bool,
) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    surface.clear_rect(0.0, 0.0, size.x, size.y);

    for p in particles {
        draw_particle(surface, config, p);
    }

    if let Some(links) = &config.links {
        if !reduced_motion {
            draw_links(surface, links, config.depth.as_ref(), particles);
        }
    }

    for wave in waves {
        let alpha = wave.alpha();
        if alpha <= 0.0 {
            continue;
        }
        surface.stroke_ellipse(
            wave.center,
            Vec2::splat(wave.radius),
            wave.color.fade(alpha),
            wave.stroke_width(),
        );
    }
}

/// Perspective scale for a particle (1 for planar fields)
fn scale_of(p: &Particle, depth: Option<&DepthConfig>) -> f32 {
    if depth.is_some() {
        perspective_scale(p.depth)
    } else {
        1.0
    }
}

/// Alpha multiplier from the particle's life: fade-out for transient
/// entities, pulse for drifting motes
fn life_alpha(p: &Particle, config: &FieldConfig) -> f32 {
    if p.is_transient() {
        p.life
    } else if config.drift.is_some() {
        pulse(p.life)
    } else {
        1.0
    }
}

fn draw_particle<S: DrawSurface>(surface: &mut S, config: &FieldConfig, p: &Particle) {
    let scale = scale_of(p, config.depth.as_ref());
    let alpha = life_alpha(p, config) * scale;
    let radius = p.radius * scale;
    if alpha <= 0.0 || radius <= 0.0 {
        return;
    }
    surface.fill_radial_circle(
        p.position,
        radius,
        RadialGradient::fade_out(p.color.fade(alpha)),
    );
}

fn draw_links<S: DrawSurface>(
    surface: &mut S,
    links: &LinkConfig,
    depth: Option<&DepthConfig>,
    particles: &[Particle],
) {
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let distance = a.position.distance(b.position);
            let weight = proximity(distance, links.distance);
            if weight <= 0.0 {
                continue;
            }

            let (alpha, width) = match depth {
                Some(depth) => {
                    if (a.depth - b.depth).abs() >= depth.link_depth {
                        continue;
                    }
                    let scale = lerp_f32(perspective_scale(a.depth), perspective_scale(b.depth), 0.5);
                    (links.alpha * weight * scale, links.width * scale)
                }
                None => (links.alpha * weight, links.width),
            };

            surface.stroke_line(a.position, b.position, links.color.with_alpha(alpha), width);
        }
    }
}

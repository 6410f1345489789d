//! Entity types: particles, ripple waves, and the particle pool

use drift_core::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a particle represents; decides which per-tick rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Persistent ambient entity, never expires
    Mote,
    /// Radial water splash particle
    Spark,
    /// Falling water droplet
    Droplet,
    /// Celebration confetti piece
    Confetti,
}

impl ParticleKind {
    pub fn is_persistent(self) -> bool {
        matches!(self, ParticleKind::Mote)
    }
}

/// What happens when a particle leaves the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Velocity is mirrored back into the surface on both axes
    #[default]
    Reflect,
    /// Reflect on x only; expire once below the bottom edge
    FallThrough,
}

/// One simulated point-like entity
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Depth in [0, max_depth]; stays 0 for planar fields
    pub depth: f32,
    pub depth_velocity: f32,
    pub radius: f32,
    pub color: Color,
    /// Remaining life in (0, 1] for transient kinds, oscillation phase for motes
    pub life: f32,
    /// Life lost per tick (0 for persistent kinds)
    pub decay: f32,
    /// Added to `velocity.y` every tick
    pub gravity: f32,
    /// Velocity multiplier per tick
    pub damping: f32,
    pub boundary: Boundary,
    pub alive: bool,
}

impl Particle {
    /// A persistent entity with no forces, at rest
    pub fn mote(position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            kind: ParticleKind::Mote,
            position,
            velocity: Vec2::ZERO,
            depth: 0.0,
            depth_velocity: 0.0,
            radius,
            color,
            life: 1.0,
            decay: 0.0,
            gravity: 0.0,
            damping: 1.0,
            boundary: Boundary::Reflect,
            alive: true,
        }
    }

    /// A transient entity of `kind` with full life and the given decay
    pub fn transient(kind: ParticleKind, position: Vec2, velocity: Vec2, decay: f32) -> Self {
        Self {
            kind,
            velocity,
            decay,
            ..Self::mote(position, 1.0, Color::WHITE)
        }
    }

    pub fn is_transient(&self) -> bool {
        !self.kind.is_persistent()
    }
}

/// Relative tolerance for a wave reaching its max radius
const WAVE_EPSILON: f32 = 1e-6;

/// Expanding ripple ring
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    /// Radius gained per tick
    pub growth: f32,
    pub color: Color,
    /// Stroke width at full alpha
    pub thickness: f32,
}

impl Wave {
    pub fn new(center: Vec2, max_radius: f32, growth: f32, color: Color, thickness: f32) -> Self {
        Self {
            center,
            radius: 0.0,
            max_radius,
            growth,
            color,
            thickness,
        }
    }

    /// `1 - radius / max_radius`; zero or less once the wave is spent
    pub fn alpha(&self) -> f32 {
        if self.max_radius <= 0.0 {
            0.0
        } else {
            1.0 - self.radius / self.max_radius
        }
    }

    /// Stroke width, thinning as the ring fades
    pub fn stroke_width(&self) -> f32 {
        self.thickness * self.alpha()
    }

    /// Grow by one tick. Returns false once the wave reached its max radius.
    ///
    /// A radius within a relative epsilon of the max counts as reached, so a
    /// max like `0.6 * 50.0` (30.0000019 in f32) retires on the tick the
    /// radius hits 30.
    pub fn advance(&mut self) -> bool {
        self.radius = (self.radius + self.growth).min(self.max_radius);
        if self.max_radius - self.radius <= self.max_radius.abs() * WAVE_EPSILON {
            self.radius = self.max_radius;
            return false;
        }
        true
    }
}

/// Bounded particle storage with swap-remove compaction.
///
/// Live particles are stored contiguously; dead ones are dropped by
/// [`ParticlePool::update_and_compact`] in O(1) each. Order is not preserved.
pub struct ParticlePool {
    particles: Vec<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn alive_count(&self) -> usize {
        self.particles.len()
    }

    /// Slots left before the pool refuses spawns
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.particles.len())
    }

    /// Add a particle. Returns false (and drops it) if the pool is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.capacity {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Remove particles flagged dead via swap-remove.
    pub fn update_and_compact(&mut self) {
        let mut i = 0;
        while i < self.particles.len() {
            if !self.particles[i].alive {
                self.particles.swap_remove(i);
                // Swapped-in particle still needs checking
            } else {
                i += 1;
            }
        }
    }

    /// Remove every particle matching `pred`
    pub fn remove_where(&mut self, pred: impl Fn(&Particle) -> bool) {
        for p in &mut self.particles {
            if pred(p) {
                p.alive = false;
            }
        }
        self.update_and_compact();
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn alive_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive_slice_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

//! The particle field simulator

use crate::config::{BurstConfig, BurstOrigin, DepthConfig, DriftConfig, FieldConfig, Launch, PointerForce};
use crate::curves::perspective_scale;
use crate::particle::{Boundary, Particle, ParticleKind, ParticlePool, Wave};
use crate::rand::FieldRng;
use crate::render;
use crate::surface::DrawSurface;
use drift_core::Color;
use glam::Vec2;
use serde::Serialize;

/// Scheduling state of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// Not stepped by the host loop
    Idle,
    /// Stepped once per fixed tick
    Active,
}

/// Point-in-time summary of a field
#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    pub state: FieldState,
    pub width: f32,
    pub height: f32,
    pub ticks: u64,
    pub particles: usize,
    pub motes: usize,
    pub waves: usize,
    pub dropped: u64,
}

/// One simulator: a set of kinematic entities drawn to its own surface.
///
/// The field never schedules itself. `start`/`stop` only flip its state; the
/// host loop steps fields whose [`ParticleField::is_active`] is true.
pub struct ParticleField<S: DrawSurface> {
    config: FieldConfig,
    /// None when the host container is missing; the field is then inert
    surface: Option<S>,
    pool: ParticlePool,
    waves: Vec<Wave>,
    rng: FieldRng,
    size: Vec2,
    state: FieldState,
    pointer: Option<Vec2>,
    reduced_motion: bool,
    /// Set by `advance`, cleared by `render`
    needs_render: bool,
    ticks: u64,
    /// Spawns refused because of the entity cap
    dropped: u64,
}

impl<S: DrawSurface> ParticleField<S> {
    pub fn new(config: FieldConfig, surface: S, seed: u64) -> Self {
        Self::build(config, Some(surface), FieldRng::new(seed))
    }

    /// Field seeded from OS entropy
    pub fn with_entropy(config: FieldConfig, surface: S) -> Self {
        Self::build(config, Some(surface), FieldRng::from_entropy())
    }

    /// Field whose host container is absent. It stays idle forever and every
    /// operation is a no-op.
    pub fn detached(config: FieldConfig) -> Self {
        log::debug!("[particles] field created without a surface; staying idle");
        Self::build(config, None, FieldRng::new(0))
    }

    fn build(config: FieldConfig, surface: Option<S>, rng: FieldRng) -> Self {
        let pool = ParticlePool::new(config.max_entities);
        Self {
            config,
            surface,
            pool,
            waves: Vec::new(),
            rng,
            size: Vec2::ZERO,
            state: FieldState::Idle,
            pointer: None,
            reduced_motion: false,
            needs_render: false,
            ticks: 0,
            dropped: 0,
        }
    }

    // --- Lifecycle ---

    /// Set the logical surface size. Negative or non-finite values count as 0.
    pub fn resize(&mut self, width: f32, height: f32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let clamp = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.size = Vec2::new(clamp(width), clamp(height));
        surface.resize(self.size.x as u32, self.size.y as u32);
        self.needs_render = true;
    }

    /// Replace the ambient population with `floor(area / density)` fresh motes.
    /// Transient entities are kept.
    pub fn init_ambient(&mut self) {
        if self.surface.is_none() {
            return;
        }
        let Some(ambient) = self.config.ambient.clone() else {
            return;
        };

        self.pool.remove_where(|p| p.kind == ParticleKind::Mote);

        let area = self.size.x * self.size.y;
        let wanted = if area > 0.0 {
            (area / ambient.density).floor() as usize
        } else {
            0
        };
        let count = wanted.min(self.pool.remaining());
        if count < wanted {
            log::warn!(
                "[particles] ambient population clamped from {wanted} to {count} (max_entities = {})",
                self.config.max_entities
            );
        }

        for _ in 0..count {
            let position = self.rng.point_in(self.size.x, self.size.y);
            let radius = self.rng.range(ambient.radius_min, ambient.radius_max);
            let color = self
                .rng
                .pick(&ambient.palette)
                .copied()
                .unwrap_or(Color::WHITE);
            let mut p = Particle::mote(position, radius, color);
            p.velocity = Vec2::new(
                self.rng.centered(ambient.speed),
                self.rng.centered(ambient.speed),
            );
            p.damping = ambient.damping;
            if let Some(depth) = &self.config.depth {
                p.depth = self.rng.range(0.0, depth.max_depth);
                p.depth_velocity = self.rng.centered(depth.speed);
            }
            if self.config.drift.is_some() {
                p.life = self.rng.angle();
            }
            self.pool.spawn(p);
        }
        self.needs_render = true;
        log::debug!("[particles] ambient population: {count}");
    }

    /// Spawn every configured burst and one wave at `(x, y)`, then start.
    pub fn inject_impulse(&mut self, x: f32, y: f32) {
        if self.surface.is_none() {
            return;
        }
        let at = Vec2::new(x, y);
        let mut refused = 0u64;

        for burst in &self.config.bursts {
            for _ in 0..burst.count {
                let p = spawn_burst_particle(&mut self.rng, burst, at, self.size);
                if !self.pool.spawn(p) {
                    refused += 1;
                }
            }
        }

        if let Some(wave) = &self.config.wave {
            if self.waves.len() < self.config.max_entities {
                let max_radius = wave.max_fraction * self.size.x.min(self.size.y);
                self.waves
                    .push(Wave::new(at, max_radius, wave.growth, wave.color, wave.thickness));
            } else {
                refused += 1;
            }
        }

        if refused > 0 {
            self.dropped += refused;
            log::debug!("[particles] entity cap reached, dropped {refused} spawn(s)");
        }
        self.start();
    }

    /// Begin being stepped. Returns false if the field was already active
    /// (or has no surface).
    pub fn start(&mut self) -> bool {
        if self.surface.is_none() || self.state == FieldState::Active {
            return false;
        }
        self.state = FieldState::Active;
        log::debug!("[particles] field started");
        true
    }

    /// Stop being stepped. Entities and the last frame stay as they are.
    pub fn stop(&mut self) -> bool {
        if self.state == FieldState::Idle {
            return false;
        }
        self.state = FieldState::Idle;
        log::debug!("[particles] field stopped");
        true
    }

    /// Stop, drop every entity, and blank the surface now.
    pub fn clear(&mut self) {
        self.state = FieldState::Idle;
        self.pool.clear();
        self.waves.clear();
        self.needs_render = false;
        if let Some(surface) = self.surface.as_mut() {
            surface.clear_rect(0.0, 0.0, self.size.x, self.size.y);
        }
    }

    // --- Per-tick ---

    /// Latest pointer position relative to this field (None = no pointer)
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    /// Suppress connection lines while the host is short on frame time
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Advance physics by one tick, then draw.
    pub fn step(&mut self) {
        self.advance();
        self.render();
    }

    /// Advance physics by one tick without drawing.
    ///
    /// Transient-only fields go idle once their last entity expires.
    pub fn advance(&mut self) {
        if self.surface.is_none() {
            return;
        }
        self.ticks += 1;

        let env = TickEnv {
            size: self.size,
            bounded: self.size.x > 0.0 && self.size.y > 0.0,
            pointer: self.pointer.zip(self.config.pointer),
            depth: self.config.depth,
            drift: self.config.drift,
        };
        for p in self.pool.alive_slice_mut() {
            integrate(p, &env);
        }
        self.pool.update_and_compact();
        self.waves.retain_mut(Wave::advance);

        if !self.config.has_ambient()
            && self.pool.alive_count() == 0
            && self.waves.is_empty()
            && self.state == FieldState::Active
        {
            self.state = FieldState::Idle;
            log::debug!("[particles] field drained after {} ticks", self.ticks);
        }
        self.needs_render = true;
    }

    /// Draw the current entities. A zero-area surface draws nothing.
    pub fn render(&mut self) {
        self.needs_render = false;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        render::draw_frame(
            surface,
            self.size,
            &self.config,
            self.pool.alive_slice(),
            &self.waves,
            self.reduced_motion,
        );
    }

    // --- Queries ---

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == FieldState::Active
    }

    /// True once the surface holds a frame older than the entity state
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    pub fn is_detached(&self) -> bool {
        self.surface.is_none()
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Pointer position the last tick saw, relative to this field
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.alive_slice()
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Particles plus waves
    pub fn entity_count(&self) -> usize {
        self.pool.alive_count() + self.waves.len()
    }

    pub fn count_kind(&self, kind: ParticleKind) -> usize {
        self.particles().iter().filter(|p| p.kind == kind).count()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            state: self.state,
            width: self.size.x,
            height: self.size.y,
            ticks: self.ticks,
            particles: self.pool.alive_count(),
            motes: self.count_kind(ParticleKind::Mote),
            waves: self.waves.len(),
            dropped: self.dropped,
        }
    }
}

/// Read-only inputs shared by every particle in one tick
struct TickEnv {
    size: Vec2,
    /// False for a zero-area surface: no boundary policy applies
    bounded: bool,
    pointer: Option<(Vec2, PointerForce)>,
    depth: Option<DepthConfig>,
    drift: Option<DriftConfig>,
}

/// One tick of a single particle: integrate, forces, boundary, damping, life.
fn integrate(p: &mut Particle, env: &TickEnv) {
    p.position += p.velocity;
    if env.depth.is_some() {
        p.depth += p.depth_velocity;
    }

    p.velocity.y += p.gravity;

    if let Some((pointer, force)) = env.pointer {
        let scale = if env.depth.is_some() {
            perspective_scale(p.depth)
        } else {
            1.0
        };
        p.velocity -= pointer_push(p.position, pointer, force) * scale;
    }

    if let Some(drift) = env.drift.filter(|_| p.kind.is_persistent()) {
        p.life += drift.phase_step;
        p.position.x += p.life.sin() * drift.amplitude;
    }

    if env.bounded {
        p.velocity.x = reflect(p.position.x, p.velocity.x, env.size.x);
        match p.boundary {
            Boundary::Reflect => p.velocity.y = reflect(p.position.y, p.velocity.y, env.size.y),
            Boundary::FallThrough => {
                if p.position.y > env.size.y {
                    p.alive = false;
                }
            }
        }
    }
    if let Some(depth) = env.depth {
        p.depth_velocity = reflect(p.depth, p.depth_velocity, depth.max_depth);
    }

    p.velocity *= p.damping;
    p.depth_velocity *= p.damping;

    if p.is_transient() {
        p.life -= p.decay;
        if p.life <= 0.0 {
            p.alive = false;
        }
    }
}

/// Velocity change away from the pointer, scaled by `(radius - d) / radius`.
/// Zero at or beyond the radius and at zero distance.
fn pointer_push(position: Vec2, pointer: Vec2, force: PointerForce) -> Vec2 {
    let delta = pointer - position;
    let distance = delta.length();
    if distance <= 0.0 || distance >= force.radius {
        return Vec2::ZERO;
    }
    let falloff = (force.radius - distance) / force.radius;
    delta / distance * falloff * force.strength
}

/// Point `velocity` back into `[0, max]` when `position` has left it
fn reflect(position: f32, velocity: f32, max: f32) -> f32 {
    if position < 0.0 {
        velocity.abs()
    } else if position > max {
        -velocity.abs()
    } else {
        velocity
    }
}

fn spawn_burst_particle(rng: &mut FieldRng, burst: &BurstConfig, at: Vec2, size: Vec2) -> Particle {
    let position = match burst.origin {
        BurstOrigin::Impulse => at,
        BurstOrigin::TopEdge { offset } => Vec2::new(rng.range(0.0, size.x), -offset),
    };
    let velocity = match burst.launch {
        Launch::Radial {
            speed_min,
            speed_max,
        } => Vec2::from_angle(rng.angle()) * rng.range(speed_min, speed_max),
        Launch::Scatter {
            vx_min,
            vx_max,
            vy_min,
            vy_max,
        } => Vec2::new(rng.range(vx_min, vx_max), rng.range(vy_min, vy_max)),
    };
    let decay = rng.range(burst.decay_min, burst.decay_max);

    let mut p = Particle::transient(burst.kind, position, velocity, decay);
    p.radius = rng.range(burst.size_min, burst.size_max);
    p.color = rng.pick(&burst.palette).copied().unwrap_or(Color::WHITE);
    p.gravity = burst.gravity;
    p.damping = burst.damping;
    p.boundary = burst.boundary;
    p
}

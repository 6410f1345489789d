//! Headless simulation command

use crate::scene::Scene;
use anyhow::{Context, Result};
use drift_particles::{DrawCounts, DrawSurface, FieldSnapshot, FieldSystem, ParticleField, RecordingSurface};
use drift_runtime::{FrameLoop, GameClock, HostContext, HostEvent, SharedSystem};
use glam::Vec2;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Where the fields of a run come from and what happens to them
pub struct RunPlan {
    pub preset: Option<String>,
    pub scene: Option<String>,
    pub width: f32,
    pub height: f32,
    pub frames: u32,
    pub seed: Option<u64>,
    /// Field-relative impulse points, applied to every field on the first frame
    pub impulses: Vec<[f32; 2]>,
    /// Page-space pointer position held for the whole run
    pub pointer: Option<[f32; 2]>,
    /// Pointer easing factor (overrides the scene's)
    pub pointer_smoothing: Option<f32>,
}

impl RunPlan {
    /// The validated scene this plan runs, with CLI settings taking precedence
    pub fn scene(&self) -> Result<Scene> {
        let mut scene = match (&self.scene, &self.preset) {
            (Some(path), None) => Scene::load(path)?,
            (None, Some(preset)) => Scene::single(preset, self.width, self.height),
            (None, None) => Scene::single("ambient", self.width, self.height),
            (Some(_), Some(_)) => anyhow::bail!("--preset and --scene are mutually exclusive"),
        };
        if self.seed.is_some() {
            scene.seed = self.seed;
        }
        if self.pointer_smoothing.is_some() {
            scene.pointer_smoothing = self.pointer_smoothing;
        }
        scene.validate()?;
        Ok(scene)
    }
}

/// Host state for a scene run
fn host_context(scene: &Scene) -> HostContext {
    match scene.pointer_smoothing {
        Some(factor) => HostContext::with_pointer_smoothing(factor),
        None => HostContext::new(),
    }
}

/// What one field looked like at the end of a run
#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub preset: String,
    #[serde(flatten)]
    pub snapshot: FieldSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_calls: Option<DrawCounts>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    frames: u32,
    field: &'a [FieldReport],
}

/// Build every field of `scene`, drive them for `plan.frames` frames and
/// hand the system back for inspection.
pub fn run_scene<S, F>(
    scene: &Scene,
    plan: &RunPlan,
    mut make_surface: F,
) -> Result<Rc<RefCell<FieldSystem<S>>>>
where
    S: DrawSurface + 'static,
    F: FnMut(u32, u32) -> S,
{
    let mut system = FieldSystem::new();
    let mut ids = Vec::with_capacity(scene.fields.len());
    for (i, entry) in scene.fields.iter().enumerate() {
        let config = entry.config()?;
        let surface = make_surface(entry.width.max(0.0) as u32, entry.height.max(0.0) as u32);
        let mut field = match scene.seed {
            Some(seed) => ParticleField::new(config, surface, seed.wrapping_add(i as u64)),
            None => ParticleField::with_entropy(config, surface),
        };
        field.resize(entry.width, entry.height);
        let origin = Vec2::from(entry.origin);
        ids.push((system.add_field(entry.name.clone(), origin, field), origin, entry));
    }

    let shared = Rc::new(RefCell::new(system));
    let mut frame_loop = FrameLoop::new(
        GameClock::with_fixed_timestep(scene.tick_rate),
        host_context(scene),
    );
    frame_loop
        .register(Box::new(SharedSystem::new(shared.clone())))
        .context("Failed to initialize particle fields")?;

    if let Some([x, y]) = plan.pointer {
        frame_loop.push_event(HostEvent::PointerMoved { x, y });
        for (id, origin, entry) in &ids {
            let inside = x >= origin.x
                && y >= origin.y
                && x < origin.x + entry.width
                && y < origin.y + entry.height;
            if inside {
                frame_loop.push_event(HostEvent::PointerEntered { field: *id });
            }
        }
    }
    for [x, y] in &plan.impulses {
        for (id, _, _) in &ids {
            frame_loop.push_event(HostEvent::Impulse {
                field: *id,
                x: *x,
                y: *y,
            });
        }
    }

    let dt = 1.0 / scene.tick_rate;
    let mut ticks = 0;
    for _ in 0..plan.frames {
        ticks += frame_loop.frame(dt)?;
    }
    log::info!(
        "Ran {} frame(s), {} tick(s), {} live entities",
        plan.frames,
        ticks,
        shared.borrow().total_entities()
    );
    Ok(shared)
}

/// Per-field reports in scene order
pub fn reports<S: DrawSurface>(
    scene: &Scene,
    system: &FieldSystem<S>,
    draw_calls: impl Fn(&S) -> Option<DrawCounts>,
) -> Vec<FieldReport> {
    system
        .slots()
        .iter()
        .zip(&scene.fields)
        .map(|(slot, entry)| FieldReport {
            name: slot.name.clone(),
            preset: entry.preset.clone(),
            snapshot: slot.field.snapshot(),
            draw_calls: slot.field.surface().and_then(&draw_calls),
        })
        .collect()
}

pub fn print_reports(frames: u32, reports: &[FieldReport], format: &str) -> Result<()> {
    let report = Report {
        frames,
        field: reports,
    };
    let output = match format {
        "json" => serde_json::to_string_pretty(&report)?,
        "toml" => toml::to_string_pretty(&report)?,
        "text" => {
            let mut out = String::new();
            for r in reports {
                out.push_str(&format!(
                    "{} ({}): {:?}, {} particle(s), {} wave(s), {} tick(s)\n",
                    r.name, r.preset, r.snapshot.state, r.snapshot.particles, r.snapshot.waves, r.snapshot.ticks
                ));
            }
            out
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    };
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn run(plan: RunPlan, format: &str) -> Result<()> {
    let scene = plan.scene()?;
    let system = run_scene(&scene, &plan, |_, _| RecordingSurface::counting())?;
    let system = system.borrow();
    let reports = reports(&scene, &system, |s| Some(s.totals()));
    print_reports(plan.frames, &reports, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_particles::FieldState;

    fn plan(preset: &str, frames: u32) -> RunPlan {
        RunPlan {
            preset: Some(preset.to_string()),
            scene: None,
            width: 800.0,
            height: 600.0,
            frames,
            seed: Some(3),
            impulses: Vec::new(),
            pointer: None,
            pointer_smoothing: None,
        }
    }

    #[test]
    fn water_impulse_run_reports_batch() {
        let mut plan = plan("water", 1);
        plan.impulses.push([400.0, 300.0]);
        let scene = plan.scene().unwrap();
        let system = run_scene(&scene, &plan, |_, _| RecordingSurface::counting()).unwrap();
        let system = system.borrow();
        let reports = reports(&scene, &system, |s| Some(s.totals()));

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].snapshot.particles, 45);
        assert_eq!(reports[0].snapshot.waves, 1);
        assert_eq!(reports[0].snapshot.state, FieldState::Active);
        let draws = reports[0].draw_calls.unwrap();
        assert_eq!(draws.clears, 1);
        assert_eq!(draws.ellipses, 1);
    }

    #[test]
    fn ambient_run_keeps_population() {
        let plan = plan("ambient", 30);
        let scene = plan.scene().unwrap();
        let system = run_scene(&scene, &plan, |_, _| RecordingSurface::counting()).unwrap();
        let system = system.borrow();
        let reports = reports(&scene, &system, |_| None);
        // 800 * 600 / 15000
        assert_eq!(reports[0].snapshot.particles, 32);
        assert_eq!(reports[0].snapshot.ticks, 30);
        assert!(reports[0].draw_calls.is_none());
    }

    #[test]
    fn pointer_inside_wakes_depth_card() {
        let mut plan = plan("depth", 5);
        plan.pointer = Some([10.0, 10.0]);
        let scene = plan.scene().unwrap();
        let system = run_scene(&scene, &plan, |_, _| RecordingSurface::counting()).unwrap();
        let system = system.borrow();
        assert_eq!(system.slots()[0].field.ticks(), 5);
    }

    #[test]
    fn oversized_preset_field_is_rejected() {
        let mut plan = plan("water", 1);
        plan.width = 100_000.0;
        plan.height = 100_000.0;
        assert!(plan.scene().is_err());
    }

    #[test]
    fn pointer_smoothing_reaches_the_host_context() {
        let mut plan = plan("ambient", 1);
        assert!(host_context(&plan.scene().unwrap()).pointer.position().is_none());

        plan.pointer_smoothing = Some(0.15);
        let scene = plan.scene().unwrap();
        assert_eq!(scene.pointer_smoothing, Some(0.15));
        let mut ctx = host_context(&scene);
        ctx.pointer.set(0.0, 0.0);
        ctx.pointer.set(100.0, 0.0);
        ctx.pointer.tick();
        assert!((ctx.pointer.position().unwrap().x - 15.0).abs() < 1e-4);

        plan.pointer_smoothing = Some(2.0);
        assert!(plan.scene().is_err());
    }

    #[test]
    fn smoothed_pointer_trails_into_the_field() {
        let mut plan = plan("ambient", 1);
        plan.pointer = Some([100.0, 0.0]);
        plan.pointer_smoothing = Some(0.5);
        let scene = plan.scene().unwrap();
        let system = run_scene(&scene, &plan, |_, _| RecordingSurface::counting()).unwrap();
        // The first move seeds the eased position at the raw one
        assert_eq!(
            system.borrow().slots()[0].field.pointer(),
            Some(Vec2::new(100.0, 0.0))
        );
    }

    #[test]
    fn preset_and_scene_conflict() {
        let mut plan = plan("water", 1);
        plan.scene = Some("scene.toml".into());
        assert!(plan.scene().is_err());
    }
}

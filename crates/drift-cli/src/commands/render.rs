//! Render command: run a scene on raster surfaces and save the last frame

use super::simulate::{print_reports, reports, run_scene, RunPlan};
use anyhow::{Context, Result};
use drift_core::Color;
use drift_raster::RasterSurface;
use std::path::{Path, PathBuf};

pub struct RenderArgs {
    pub plan: RunPlan,
    pub output: String,
    pub background: Option<String>,
    pub format: String,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let background: Option<Color> = args
        .background
        .as_deref()
        .map(str::parse)
        .transpose()
        .context("Invalid --background color")?;

    let scene = args.plan.scene()?;
    let system = run_scene(&scene, &args.plan, |w, h| match background {
        Some(color) => RasterSurface::with_background(w, h, color),
        None => RasterSurface::new(w, h),
    })?;
    let system = system.borrow();

    let single = system.slots().len() == 1;
    for slot in system.slots() {
        let Some(surface) = slot.field.surface() else {
            continue;
        };
        let path = if single {
            PathBuf::from(&args.output)
        } else {
            output_for(&args.output, &slot.name)
        };
        surface
            .save_png(&path)
            .with_context(|| format!("Failed to save image to {}", path.display()))?;
        println!(
            "Rendered {}x{} frame of '{}' to {}",
            surface.width(),
            surface.height(),
            slot.name,
            path.display()
        );
    }

    let reports = reports(&scene, &system, |_| None);
    print_reports(args.plan.frames, &reports, &args.format)
}

/// `out.png` + `hero` -> `out-hero.png`
fn output_for(output: &str, field: &str) -> PathBuf {
    let path = Path::new(output);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("render");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
    path.with_file_name(format!("{stem}-{field}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_field_output_names() {
        assert_eq!(output_for("out/frame.png", "hero"), PathBuf::from("out/frame-hero.png"));
        assert_eq!(output_for("frame", "card"), PathBuf::from("frame-card.png"));
    }
}

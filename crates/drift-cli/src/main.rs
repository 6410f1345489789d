//! Drift CLI - inspect, simulate and render particle fields headlessly

mod commands;
mod scene;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::simulate::RunPlan;
use commands::{presets, render, simulate, validate};

#[derive(Parser)]
#[command(name = "drift")]
#[command(about = "Headless driver for Drift particle fields", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in presets
    Presets,

    /// Print a preset's full config
    Preset {
        /// Preset name (ambient, depth, floating, water, confetti)
        name: String,

        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },

    /// Validate a scene file
    Validate {
        /// Path to scene file
        scene: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run fields headlessly and print per-field summaries
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Output format (json, toml or text)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Run fields on a raster surface and save the last frame as PNG
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Output image path (one file per field when the scene has several)
        #[arg(short, long, default_value = "drift.png")]
        output: String,

        /// Opaque backdrop color, e.g. "#0A0E27"
        #[arg(long)]
        background: Option<String>,

        /// Summary format (json, toml or text)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Preset to run as a single field
    #[arg(long, conflicts_with = "scene")]
    preset: Option<String>,

    /// Scene file with one or more fields
    #[arg(long)]
    scene: Option<String>,

    /// Field width for --preset
    #[arg(long, default_value = "800")]
    width: f32,

    /// Field height for --preset
    #[arg(long, default_value = "600")]
    height: f32,

    /// Number of display frames to run (one tick each at the scene tick rate)
    #[arg(long, default_value = "120")]
    frames: u32,

    /// RNG seed (overrides the scene's)
    #[arg(long)]
    seed: Option<u64>,

    /// Field-relative impulse point (comma-separated x,y); repeatable
    #[arg(long, value_parser = parse_vec2)]
    impulse: Vec<[f32; 2]>,

    /// Page-space pointer position held for the whole run (x,y)
    #[arg(long, value_parser = parse_vec2)]
    pointer: Option<[f32; 2]>,

    /// Ease the pointer toward each move by this fraction per frame, in (0, 1]
    #[arg(long)]
    pointer_smoothing: Option<f32>,
}

impl From<RunArgs> for RunPlan {
    fn from(args: RunArgs) -> Self {
        RunPlan {
            preset: args.preset,
            scene: args.scene,
            width: args.width,
            height: args.height,
            frames: args.frames,
            seed: args.seed,
            impulses: args.impulse,
            pointer: args.pointer,
            pointer_smoothing: args.pointer_smoothing,
        }
    }
}

fn parse_vec2(s: &str) -> Result<[f32; 2], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err(format!("expected 2 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok([x, y])
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Presets => presets::list(),
        Commands::Preset { name, format } => presets::show(&name, &format),
        Commands::Validate { scene, format } => validate::run(&scene, &format),
        Commands::Simulate { run, format } => simulate::run(run.into(), &format),
        Commands::Render {
            run,
            output,
            background,
            format,
        } => render::run(render::RenderArgs {
            plan: run.into(),
            output,
            background,
            format,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        assert_eq!(parse_vec2("10, 20.5"), Ok([10.0, 20.5]));
        assert!(parse_vec2("1,2,3").is_err());
        assert!(parse_vec2("a,2").is_err());
    }

    #[test]
    fn cli_accepts_repeated_impulses() {
        let cli = Cli::try_parse_from([
            "drift", "simulate", "--preset", "water", "--impulse", "10,10", "--impulse", "20,30",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate { run, format } => {
                assert_eq!(run.impulse, vec![[10.0, 10.0], [20.0, 30.0]]);
                assert_eq!(format, "json");
            }
            _ => panic!("expected simulate"),
        }
    }
}

//! Scene validation command

use crate::scene::Scene;
use anyhow::Result;
use serde::Serialize;

#[derive(Serialize)]
struct FieldCheck {
    name: String,
    preset: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ambient_population: Option<usize>,
}

pub fn run(path: &str, format: &str) -> Result<()> {
    let scene = Scene::load(path)?;

    let checks: Vec<FieldCheck> = scene
        .fields
        .iter()
        .map(|entry| match entry.config() {
            Ok(config) => FieldCheck {
                name: entry.name.clone(),
                preset: entry.preset.clone(),
                ok: true,
                error: None,
                ambient_population: config.ambient.as_ref().map(|a| {
                    let area = entry.width.max(0.0) * entry.height.max(0.0);
                    ((area / a.density).floor() as usize).min(config.max_entities)
                }),
            },
            Err(e) => FieldCheck {
                name: entry.name.clone(),
                preset: entry.preset.clone(),
                ok: false,
                error: Some(format!("{e:#}")),
                ambient_population: None,
            },
        })
        .collect();
    let failed = checks.iter().filter(|c| !c.ok).count();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&checks)?),
        "text" => {
            for check in &checks {
                match (&check.error, check.ambient_population) {
                    (Some(error), _) => println!("  FAIL {} ({}): {}", check.name, check.preset, error),
                    (None, Some(n)) => {
                        println!("  ok   {} ({}): {} ambient particle(s)", check.name, check.preset, n)
                    }
                    (None, None) => println!("  ok   {} ({})", check.name, check.preset),
                }
            }
            println!(
                "{} field(s), {} invalid, tick rate {} Hz",
                checks.len(),
                failed,
                scene.tick_rate
            );
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    if failed > 0 {
        anyhow::bail!("{} invalid field(s) in {}", failed, path);
    }
    Ok(())
}

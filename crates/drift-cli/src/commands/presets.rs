//! Preset listing and dumping

use anyhow::{Context, Result};
use drift_particles::Preset;

pub fn list() -> Result<()> {
    for preset in Preset::ALL {
        let config = preset.config();
        let kind = if config.has_ambient() {
            "ambient"
        } else {
            "impulse"
        };
        println!("{:<10} [{:<7}] {}", preset.name(), kind, preset.description());
    }
    Ok(())
}

pub fn show(name: &str, format: &str) -> Result<()> {
    let preset: Preset = name.parse()?;
    let config = preset.config();
    let output = match format {
        "toml" => config
            .to_toml_string()
            .context("Failed to serialize preset")?,
        "json" => serde_json::to_string_pretty(&config)?,
        _ => anyhow::bail!("Unknown format: {}", format),
    };
    println!("{}", output);
    Ok(())
}

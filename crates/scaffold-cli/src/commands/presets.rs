//! `scaffold presets` and `scaffold features`.

use serde::Serialize;
use tracing::debug;

use crate::{
    cli::FeaturesArgs,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct PresetInfo<'a> {
    name: &'a str,
    requested: &'a [String],
    resolved: Vec<&'static str>,
}

/// List every preset with its requested and resolved features.
pub fn list(config: AppConfig, output: OutputManager) -> CliResult<()> {
    let resolver = config.feature_resolver()?;
    let presets: Vec<PresetInfo<'_>> = resolver
        .presets()
        .into_iter()
        .map(|name| PresetInfo {
            name,
            requested: resolver.preset_features(name),
            resolved: resolver.resolve(name).names(),
        })
        .collect();
    debug!(count = presets.len(), "Presets listed");

    if output.is_json() {
        return output.json(&presets);
    }

    if presets.is_empty() {
        output.warning("No presets configured")?;
        return Ok(());
    }

    output.header("Available presets:")?;
    let width = presets.iter().map(|p| p.name.len()).max().unwrap_or(0);
    for preset in &presets {
        output.print(&format!(
            "  {:<width$}  {}",
            preset.name,
            preset.requested.join(", ")
        ))?;
    }
    output.print("")?;
    output.info("Run 'scaffold features <PRESET>' to see the resolved set")?;
    Ok(())
}

/// Resolve one preset and print the active features.
pub fn features(args: FeaturesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let resolver = config.feature_resolver()?;
    let known = resolver.presets().contains(&args.preset.as_str());
    let active = resolver.resolve(&args.preset);

    if output.is_json() {
        return output.json(&PresetInfo {
            name: &args.preset,
            requested: resolver.preset_features(&args.preset),
            resolved: active.names(),
        });
    }

    if !known {
        output.warning(&format!(
            "Unknown preset '{}': only core files will be generated",
            args.preset
        ))?;
    }

    output.header(&format!("Features for '{}':", args.preset))?;
    for name in active.names() {
        output.print(&format!("  {name}"))?;
    }
    Ok(())
}

//! Config command - show the effective configuration and its provenance.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Run the config command.
pub async fn run(_args: ConfigArgs, ctx: &Context) -> Result<()> {
    let loaded = &ctx.loaded;

    println!("# Taliesin Configuration\n");

    println!("Config file search order (later overrides earlier):");
    for source in &loaded.sources {
        let status = if source.loaded {
            "✓ loaded   "
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }
    println!("  ✓ env       TALIESIN_* variables");
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for warning in &loaded.warnings {
            println!("  ⚠ {}", warning);
        }
        println!();
    }

    // Materialize section defaults so the output shows what a session would
    // actually run with.
    let mut effective = loaded.config.clone();
    effective.memory.get_or_insert_with(Default::default);
    effective.services.get_or_insert_with(Default::default);
    effective.log.get_or_insert_with(Default::default);

    println!("Effective configuration:\n");
    println!("{}", effective.to_toml()?);

    Ok(())
}

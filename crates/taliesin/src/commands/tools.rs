//! Tools command - list the registered tools.

use anyhow::Result;
use clap::Args;

use taliesin_agent::default_registry;

use super::Context;

/// Arguments for the tools command.
#[derive(Args, Debug)]
pub struct ToolsArgs {}

/// Run the tools command.
pub async fn run(_args: ToolsArgs, _ctx: &Context) -> Result<()> {
    let registry = default_registry();

    let mut names = registry.names();
    names.sort_unstable();

    println!("{} tools registered:\n", registry.len());
    for name in names {
        if let Some(tool) = registry.get(name) {
            println!("  {:<24} {}", name, tool.description());
        }
    }

    Ok(())
}

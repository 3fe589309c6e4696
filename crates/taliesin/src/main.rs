//! Taliesin - personal assistant backend with per-user conscious memory
//!
//! Main entry point for the Taliesin CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use taliesin_config::LogSection;

mod commands;

use commands::{config, session, tools};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Taliesin - personal assistant backend with per-user conscious memory
#[derive(Parser)]
#[command(name = "taliesin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one conversational session over stdin/stdout
    Session(session::SessionArgs),

    /// List the registered tools
    Tools(tools::ToolsArgs),

    /// Show the effective configuration and where it came from
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = taliesin_config::load_config(None)?;
    let log = loaded.config.log.clone().unwrap_or_default();

    // Stdout carries tool results only, so all logging goes to stderr and
    // (optionally) a rolling JSON file. The guard must live until exit.
    let _guard = init_tracing(cli.verbose, &log);

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }

    let ctx = commands::Context {
        loaded,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Session(args) => session::run(args, &ctx).await,
        Commands::Tools(args) => tools::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

/// Initialize tracing: stderr console layer plus an optional rotating JSON
/// file layer when `[log] dir` is configured.
fn init_tracing(verbose: bool, log: &LogSection) -> Option<WorkerGuard> {
    let stderr_filter = if verbose {
        EnvFilter::new(
            "taliesin=debug,taliesin_agent=debug,taliesin_session=debug,\
             taliesin_memory=debug,taliesin_services=debug,taliesin_config=debug,info",
        )
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let mut guard = None;
    let file_layer = log.dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "taliesin.log");
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(appender);
        guard = Some(worker_guard);
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_filter(EnvFilter::new(
                "taliesin=trace,taliesin_agent=trace,taliesin_session=trace,\
                 taliesin_memory=trace,taliesin_services=trace,taliesin_config=trace,info",
            ))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

//! CLI command handlers.

pub mod config;
pub mod session;
pub mod tools;

use taliesin_config::LoadedConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Discovered configuration with provenance.
    pub loaded: LoadedConfig,
    /// Verbose output enabled.
    pub verbose: bool,
}

//! Configuration system for the Taliesin assistant backend.
//!
//! Provides TOML-based configuration with:
//! - Config file layering (XDG user config + project-local overrides)
//! - `TALIESIN_*` environment variable overrides on top of file values
//! - Lazy memory-store validation: a missing `memory.database_path` is not
//!   an error at load time; the provider reports it at first open
//!
//! Sections: `[memory]` (database path, idle timeout, optional background
//! sweep interval), `[services]` (Google API base URLs and timeout),
//! `[log]` (level, optional JSON log directory).

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options, xdg_config_dir,
    xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;

//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [memory]                 # memory store + session cache
//! [services]               # Google API client
//! [log]                    # logging output
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Maps to the full TOML config file. All sections are optional so that
/// partial configs (e.g., project-local overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaliesinConfig {
    /// Memory store and session cache configuration.
    pub memory: Option<MemorySection>,

    /// Productivity services client configuration.
    pub services: Option<ServicesSection>,

    /// Logging configuration.
    pub log: Option<LogSection>,
}

impl TaliesinConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: TaliesinConfig) {
        if other.memory.is_some() {
            self.memory = other.memory;
        }

        if other.services.is_some() {
            self.services = other.services;
        }

        if other.log.is_some() {
            self.log = other.log;
        }
    }

    /// Apply `TALIESIN_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment in production,
    /// a map in tests). Empty values are treated as unset.
    fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| get(name).filter(|v| !v.is_empty());

        if let Some(path) = get("TALIESIN_DATABASE_PATH") {
            self.memory.get_or_insert_with(Default::default).database_path =
                Some(PathBuf::from(path));
        }

        if let Some(raw) = get("TALIESIN_IDLE_TIMEOUT_SECS") {
            let secs = parse_secs("TALIESIN_IDLE_TIMEOUT_SECS", &raw)?;
            self.memory
                .get_or_insert_with(Default::default)
                .idle_timeout_secs = secs;
        }

        if let Some(raw) = get("TALIESIN_SWEEP_INTERVAL_SECS") {
            let secs = parse_secs("TALIESIN_SWEEP_INTERVAL_SECS", &raw)?;
            self.memory
                .get_or_insert_with(Default::default)
                .sweep_interval_secs = Some(secs);
        }

        if let Some(level) = get("TALIESIN_LOG_LEVEL") {
            self.log.get_or_insert_with(Default::default).level = level;
        }

        if let Some(dir) = get("TALIESIN_LOG_DIR") {
            self.log.get_or_insert_with(Default::default).dir = Some(PathBuf::from(dir));
        }

        Ok(())
    }
}

fn parse_secs(field: &str, raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        field: field.to_string(),
        reason: format!("expected a number of seconds, got '{}'", raw),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Section
// ─────────────────────────────────────────────────────────────────────────────

/// The `[memory]` section: memory store connection and session cache policy.
///
/// `database_path` is deliberately optional here — a missing connection
/// target is reported when the first handle is opened, not at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    /// Path to the shared SQLite database backing per-user memory stores.
    pub database_path: Option<PathBuf>,
    /// Seconds a session entry may sit unused before the reaper evicts it.
    pub idle_timeout_secs: u64,
    /// Interval for the background reaper task. Unset disables it; the
    /// pre-session sweep always runs.
    pub sweep_interval_secs: Option<u64>,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            database_path: None,
            idle_timeout_secs: 3600,
            sweep_interval_secs: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Services Section
// ─────────────────────────────────────────────────────────────────────────────

/// The `[services]` section: Google API endpoints and HTTP timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesSection {
    /// Gmail API base URL.
    pub gmail_base_url: String,
    /// Calendar API base URL.
    pub calendar_base_url: String,
    /// Tasks API base URL.
    pub tasks_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServicesSection {
    fn default() -> Self {
        Self {
            gmail_base_url: "https://gmail.googleapis.com/gmail/v1".to_string(),
            calendar_base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            tasks_base_url: "https://tasks.googleapis.com/tasks/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Log Section
// ─────────────────────────────────────────────────────────────────────────────

/// The `[log]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for daily-rolling JSON logs. Unset disables the file layer.
    pub dir: Option<PathBuf>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let memory = MemorySection::default();
        assert!(memory.database_path.is_none());
        assert_eq!(memory.idle_timeout_secs, 3600);
        assert!(memory.sweep_interval_secs.is_none());

        let services = ServicesSection::default();
        assert!(services.gmail_base_url.starts_with("https://gmail"));
        assert_eq!(services.timeout_secs, 30);

        let log = LogSection::default();
        assert_eq!(log.level, "info");
        assert!(log.dir.is_none());
    }

    #[test]
    fn test_from_toml() {
        let config = TaliesinConfig::from_toml(
            r#"
[memory]
database_path = "/var/lib/taliesin/memory.db"
idle_timeout_secs = 600

[services]
timeout_secs = 5
"#,
        )
        .unwrap();

        let memory = config.memory.unwrap();
        assert_eq!(
            memory.database_path.as_deref(),
            Some(std::path::Path::new("/var/lib/taliesin/memory.db"))
        );
        assert_eq!(memory.idle_timeout_secs, 600);
        // Unspecified fields fall back to section defaults
        assert!(memory.sweep_interval_secs.is_none());
        assert_eq!(config.services.unwrap().timeout_secs, 5);
        assert!(config.log.is_none());
    }

    #[test]
    fn test_merge_replaces_whole_sections() {
        let mut base = TaliesinConfig::from_toml(
            r#"
[memory]
database_path = "/base.db"
idle_timeout_secs = 100

[log]
level = "debug"
"#,
        )
        .unwrap();

        let overlay = TaliesinConfig::from_toml(
            r#"
[memory]
idle_timeout_secs = 200
"#,
        )
        .unwrap();

        base.merge(overlay);

        let memory = base.memory.unwrap();
        assert_eq!(memory.idle_timeout_secs, 200);
        // Section replacement, not field merge: the overlay's section default wins
        assert!(memory.database_path.is_none());
        // Untouched sections survive
        assert_eq!(base.log.unwrap().level, "debug");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TALIESIN_DATABASE_PATH", "/from/env.db"),
            ("TALIESIN_IDLE_TIMEOUT_SECS", "120"),
            ("TALIESIN_SWEEP_INTERVAL_SECS", "30"),
            ("TALIESIN_LOG_LEVEL", "trace"),
        ]);

        let mut config = TaliesinConfig::new();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        let memory = config.memory.unwrap();
        assert_eq!(
            memory.database_path.as_deref(),
            Some(std::path::Path::new("/from/env.db"))
        );
        assert_eq!(memory.idle_timeout_secs, 120);
        assert_eq!(memory.sweep_interval_secs, Some(30));
        assert_eq!(config.log.unwrap().level, "trace");
    }

    #[test]
    fn test_env_override_preserves_file_values() {
        let mut config = TaliesinConfig::from_toml(
            r#"
[memory]
database_path = "/from/file.db"
idle_timeout_secs = 900
"#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([("TALIESIN_IDLE_TIMEOUT_SECS", "60")]);
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        let memory = config.memory.unwrap();
        assert_eq!(memory.idle_timeout_secs, 60);
        assert_eq!(
            memory.database_path.as_deref(),
            Some(std::path::Path::new("/from/file.db"))
        );
    }

    #[test]
    fn test_env_override_invalid_number() {
        let mut config = TaliesinConfig::new();
        let err = config
            .apply_overrides(|name| {
                (name == "TALIESIN_IDLE_TIMEOUT_SECS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("TALIESIN_IDLE_TIMEOUT_SECS"));
    }

    #[test]
    fn test_empty_env_value_is_unset() {
        let mut config = TaliesinConfig::new();
        config
            .apply_overrides(|name| (name == "TALIESIN_DATABASE_PATH").then(String::new))
            .unwrap();
        assert!(config.memory.is_none());
    }

    #[test]
    fn test_to_toml() {
        let mut config = TaliesinConfig::new();
        config.memory = Some(MemorySection {
            database_path: Some(PathBuf::from("/data/memory.db")),
            idle_timeout_secs: 1800,
            sweep_interval_secs: Some(300),
        });

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[memory]"));
        assert!(rendered.contains("idle_timeout_secs = 1800"));
        assert!(rendered.contains("sweep_interval_secs = 300"));
    }
}

//! Configuration for the session cache.

use std::time::Duration;

/// Default idle timeout after which an unused entry becomes eligible for
/// eviction.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Configuration for the session cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry may sit unused before a sweep evicts it.
    /// The timeout is shared by all entries; it is not per-user.
    pub idle_timeout: Duration,

    /// Optional interval for the background reaper task.
    /// When `None`, sweeps run only when callers invoke them.
    pub sweep_interval: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            sweep_interval: None,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idle timeout.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Enable the background reaper with the given sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }
}

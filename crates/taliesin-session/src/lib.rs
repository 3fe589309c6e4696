//! Per-user memory session cache with idle eviction.
//!
//! This crate provides the keyed registry at the heart of the assistant:
//! - Lazy handle creation through a pluggable [`HandleProvider`]
//! - Last-access tracking with get-or-create and touch semantics
//! - A reaper sweep that evicts entries idle past a configurable timeout,
//!   runnable on demand or as a background task
//!
//! # Example
//!
//! ```rust,ignore
//! use taliesin_session::{CacheConfig, SessionCache};
//!
//! let config = CacheConfig::default()
//!     .with_idle_timeout(Duration::from_secs(3600));
//!
//! let cache = SessionCache::new(provider, config);
//! let handle = cache.get_or_create("user-1").await?;
//! ```

mod cache;
mod config;
mod error;
mod provider;
mod reaper;

pub use cache::SessionCache;
pub use config::{CacheConfig, DEFAULT_IDLE_TIMEOUT};
pub use error::{ProviderError, Result};
pub use provider::HandleProvider;
pub use reaper::spawn_reaper;

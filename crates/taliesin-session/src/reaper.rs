//! Background reaper task for periodic idle sweeps.
//!
//! The primary sweep point is on demand, before a new session starts; this
//! module adds the optional periodic arrangement for long-running
//! processes. Both share the same sweep, so the mutual-exclusion
//! guarantees hold regardless of how the sweep is scheduled.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::SessionCache;
use crate::provider::HandleProvider;

/// Spawn a background task that sweeps the cache on a fixed interval.
///
/// The first sweep runs one full interval after spawn. Cancelling the
/// token stops the task; a sweep already in progress finishes first, so
/// awaiting the returned handle after cancellation confirms the reaper is
/// fully quiesced.
pub fn spawn_reaper<P: HandleProvider>(
    cache: SessionCache<P>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() yields immediately; consume that tick so the first
        // sweep happens one interval in.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Session reaper started");
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Session reaper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    cache.sweep().await;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::config::CacheConfig;
    use crate::error::Result;

    struct UnitProvider;

    #[async_trait]
    impl HandleProvider for UnitProvider {
        type Handle = usize;

        async fn open(&self, _user_id: &str) -> Result<usize> {
            Ok(0)
        }

        async fn close(&self, _handle: usize) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reaper_evicts_idle_entries() {
        let config = CacheConfig::new().with_idle_timeout(Duration::from_millis(20));
        let cache = SessionCache::new(UnitProvider, config);

        cache.get_or_create("alice").await.unwrap();
        assert_eq!(cache.len(), 1);

        let token = CancellationToken::new();
        let reaper = spawn_reaper(cache.clone(), Duration::from_millis(25), token.clone());

        // A few intervals is plenty for the entry to go idle and be swept.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.is_empty());

        token.cancel();
        reaper.await.unwrap();
    }

    #[tokio::test]
    async fn test_reaper_stops_on_cancel() {
        let cache = SessionCache::new(UnitProvider, CacheConfig::new());
        let token = CancellationToken::new();

        let reaper = spawn_reaper(cache, Duration::from_secs(3600), token.clone());
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), reaper)
            .await
            .expect("reaper should exit promptly after cancel")
            .unwrap();
    }
}

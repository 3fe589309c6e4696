//! Keyed registry of per-user memory handles with idle eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::provider::HandleProvider;

/// Per-user slot state, guarded by the slot's async mutex.
///
/// `handle == None` with `evicted == false` means creation is pending or
/// in flight. `evicted == true` is a tombstone: the slot has been detached
/// from the registry and must never be reused.
struct SlotState<H> {
    handle: Option<H>,
    last_access: Instant,
    evicted: bool,
}

/// One user's entry: an async critical section over the slot state.
///
/// The mutex is held across the provider's `open` and `close`, so
/// creation, touch, and remove-and-close for one user are mutually
/// exclusive while other users proceed through their own slots.
struct Slot<H> {
    state: tokio::sync::Mutex<SlotState<H>>,
}

impl<H> Slot<H> {
    fn vacant(now: Instant) -> Self {
        Self {
            state: tokio::sync::Mutex::new(SlotState {
                handle: None,
                last_access: now,
                evicted: false,
            }),
        }
    }
}

/// Inner state shared between cache clones.
struct CacheInner<P: HandleProvider> {
    /// Structural registry: key lookup, insert, and delete only.
    /// Never held across an await.
    slots: Mutex<HashMap<String, Arc<Slot<P::Handle>>>>,

    /// Backend that opens and closes handles.
    provider: P,

    /// Timeout policy shared by all entries.
    config: CacheConfig,
}

/// Keyed registry mapping a user id to a live memory handle and its
/// last-access time.
///
/// Two locking levels keep users independent: a structural `parking_lot`
/// mutex guards the key map and is held only for lookup/insert/delete,
/// while each slot carries its own `tokio::sync::Mutex` held across the
/// provider's async `open`/`close`. Concurrent first-time requests for one
/// user serialize on the slot and observe a single handle; requests for
/// different users never contend.
///
/// A removed slot is tombstoned before its lock is released, and the
/// tombstoning always detaches the registry mapping in the same critical
/// section. A waiter that observes the tombstone therefore retries the
/// registry lookup and lands on a fresh slot — an evicted handle is never
/// resurrected.
///
/// Cloning is cheap; clones share the same registry.
pub struct SessionCache<P: HandleProvider> {
    inner: Arc<CacheInner<P>>,
}

impl<P: HandleProvider> Clone for SessionCache<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: HandleProvider> SessionCache<P> {
    /// Create a new cache over the given provider.
    pub fn new(provider: P, config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                slots: Mutex::new(HashMap::new()),
                provider,
                config,
            }),
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Current number of registered entries (entries mid-creation count).
    pub fn len(&self) -> usize {
        self.inner.slots.lock().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.slots.lock().is_empty()
    }

    /// Check if an entry is registered for the given user.
    pub fn contains(&self, user_id: &str) -> bool {
        self.inner.slots.lock().contains_key(user_id)
    }

    /// Get the user's handle, opening one via the provider on first use.
    ///
    /// Reuse updates the entry's last-access time. Creation inserts the
    /// entry with `last_access = now` and returns the freshly opened
    /// handle. If the provider fails, the entry is discarded so a later
    /// call can retry, and the provider's error is returned.
    pub async fn get_or_create(&self, user_id: &str) -> Result<P::Handle> {
        self.get_or_create_at(user_id, Instant::now()).await
    }

    async fn get_or_create_at(&self, user_id: &str, now: Instant) -> Result<P::Handle> {
        loop {
            let slot = {
                let mut slots = self.inner.slots.lock();
                Arc::clone(
                    slots
                        .entry(user_id.to_string())
                        .or_insert_with(|| Arc::new(Slot::vacant(now))),
                )
            };

            let mut state = slot.state.lock().await;

            // The slot was detached between our lookup and the lock; it is
            // terminal, so retry against the registry.
            if state.evicted {
                continue;
            }

            if let Some(handle) = state.handle.clone() {
                state.last_access = now;
                trace!(user_id = %user_id, "Reusing cached memory handle");
                return Ok(handle);
            }

            // We are the creator: open while holding only this user's slot.
            debug!(user_id = %user_id, "Opening memory handle");
            match self.inner.provider.open(user_id).await {
                Ok(handle) => {
                    state.handle = Some(handle.clone());
                    state.last_access = now;
                    info!(user_id = %user_id, "Created memory session");
                    return Ok(handle);
                }
                Err(err) => {
                    // Failed creation must not pollute the registry:
                    // tombstone the slot and detach it so waiters retry
                    // with a fresh slot.
                    state.evicted = true;
                    self.detach(user_id, &slot);
                    warn!(user_id = %user_id, error = %err, "Failed to open memory handle");
                    return Err(err);
                }
            }
        }
    }

    /// Update the entry's last-access time.
    ///
    /// A missing entry is a no-op, not an error — it may have just been
    /// reaped, and the next `get_or_create` will rebuild it.
    pub async fn touch(&self, user_id: &str) {
        self.touch_at(user_id, Instant::now()).await;
    }

    async fn touch_at(&self, user_id: &str, now: Instant) {
        let Some(slot) = self.lookup(user_id) else {
            trace!(user_id = %user_id, "Touch on absent entry ignored");
            return;
        };

        let mut state = slot.state.lock().await;
        if !state.evicted && state.handle.is_some() {
            state.last_access = now;
        }
    }

    /// Atomically delete the entry and hand back its handle for closing.
    ///
    /// Returns `None` if no live entry exists. Used by the shutdown path;
    /// the sweep performs the same detachment inline with its idle check.
    pub async fn remove(&self, user_id: &str) -> Option<P::Handle> {
        let slot = self.lookup(user_id)?;

        let mut state = slot.state.lock().await;
        if state.evicted {
            return None;
        }

        let handle = state.handle.take();
        state.evicted = true;
        self.detach(user_id, &slot);
        handle
    }

    /// Evict every entry idle longer than the configured timeout.
    ///
    /// Returns the number of entries evicted. Candidate keys are
    /// snapshotted from the registry, then each is re-checked under its
    /// own slot lock so the sweep never blocks users it is not evicting.
    /// A slot whose lock is contended is in active use right now and is
    /// skipped for this round. The handle is closed while the slot lock
    /// is still held, so a same-user `get_or_create` arriving mid-close
    /// waits for the close and then builds a fresh entry. Close failures
    /// are logged and do not keep the entry registered.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Instant::now()).await
    }

    async fn sweep_at(&self, now: Instant) -> usize {
        let timeout = self.inner.config.idle_timeout;
        let candidates: Vec<(String, Arc<Slot<P::Handle>>)> = {
            let slots = self.inner.slots.lock();
            slots
                .iter()
                .map(|(user_id, slot)| (user_id.clone(), Arc::clone(slot)))
                .collect()
        };

        let mut evicted = 0;
        for (user_id, slot) in candidates {
            // A held lock means the entry is being created, touched, or
            // removed right now, so it is not idle.
            let Ok(mut state) = slot.state.try_lock() else {
                continue;
            };
            if state.evicted || state.handle.is_none() {
                continue;
            }
            if now.saturating_duration_since(state.last_access) <= timeout {
                continue;
            }

            info!(user_id = %user_id, "Evicting idle memory session");
            state.evicted = true;
            if let Some(handle) = state.handle.take() {
                if let Err(err) = self.inner.provider.close(handle).await {
                    warn!(user_id = %user_id, error = %err, "Failed to close evicted handle");
                }
            }
            self.detach(&user_id, &slot);
            evicted += 1;
        }

        if evicted > 0 {
            debug!(count = evicted, "Swept idle memory sessions");
        }
        evicted
    }

    /// Drain the registry at shutdown, closing every live handle.
    ///
    /// Returns the number of handles drained. Close failures are logged
    /// and do not leave the entry registered. An in-flight creation is
    /// waited for so its handle is not leaked; callers are expected to
    /// stop issuing new operations before draining.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<(String, Arc<Slot<P::Handle>>)> = {
            let mut slots = self.inner.slots.lock();
            slots.drain().collect()
        };

        let mut closed = 0;
        for (user_id, slot) in drained {
            let mut state = slot.state.lock().await;
            if state.evicted {
                continue;
            }
            state.evicted = true;
            if let Some(handle) = state.handle.take() {
                if let Err(err) = self.inner.provider.close(handle).await {
                    warn!(user_id = %user_id, error = %err, "Failed to close handle at shutdown");
                }
                closed += 1;
            }
        }

        if closed > 0 {
            info!(count = closed, "Closed all memory sessions");
        }
        closed
    }

    fn lookup(&self, user_id: &str) -> Option<Arc<Slot<P::Handle>>> {
        self.inner.slots.lock().get(user_id).map(Arc::clone)
    }

    /// Remove the registry mapping if it still points at this slot.
    ///
    /// Called while the slot's state lock is held, so the tombstone and
    /// the structural removal are observed together. The structural lock
    /// is taken second and only briefly; no holder of the structural lock
    /// ever waits on a slot lock, so the order cannot deadlock.
    fn detach(&self, user_id: &str, slot: &Arc<Slot<P::Handle>>) {
        let mut slots = self.inner.slots.lock();
        if let Some(current) = slots.get(user_id) {
            if Arc::ptr_eq(current, slot) {
                slots.remove(user_id);
            }
        }
    }
}

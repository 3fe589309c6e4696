//! Handle provider trait for opening and closing per-user resources.
//!
//! This module decouples the cache from any specific memory backend. The
//! [`HandleProvider`] trait uses an associated `Handle` type so backends
//! can hand out domain-specific types (e.g., an `Arc`-wrapped store)
//! without the cache knowing anything about them. `close` lives on the
//! provider rather than as a bound on the handle, which lets downstream
//! crates adapt foreign store types without wrapper friction.

use async_trait::async_trait;

use crate::error::Result;

/// Trait for backends that open and close per-user handles.
///
/// `open` may be slow (disk, network) and is awaited while only the
/// calling user's critical section is held; the cache imposes no deadline
/// of its own. A returned handle must stay usable for an unbounded number
/// of calls until `close`, and the cache calls `close` at most once per
/// handle.
#[async_trait]
pub trait HandleProvider: Send + Sync + 'static {
    /// The handle type stored in the cache.
    type Handle: Clone + Send + Sync + 'static;

    /// Open a handle for the given user.
    async fn open(&self, user_id: &str) -> Result<Self::Handle>;

    /// Close a handle previously returned by `open`.
    async fn close(&self, handle: Self::Handle) -> Result<()>;
}

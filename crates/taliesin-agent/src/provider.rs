//! Session provider backed by the per-user memory store.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use taliesin_memory::UserMemory;
use taliesin_session::{HandleProvider, ProviderError, Result as SessionResult};

/// Opens and closes per-user memory stores for the session cache.
///
/// Each user gets their own namespace, `user_{user_id}`, inside one shared
/// SQLite database file. The database path comes from configuration; a
/// provider without one refuses to open handles, which keeps the session
/// registry clean when the assistant is misconfigured.
#[derive(Debug, Clone)]
pub struct UserMemoryProvider {
    database_path: Option<PathBuf>,
}

impl UserMemoryProvider {
    /// Create a provider that opens stores at the given database path.
    pub fn new(database_path: Option<PathBuf>) -> Self {
        Self { database_path }
    }

    /// Namespace for one user's records.
    fn namespace(user_id: &str) -> String {
        format!("user_{}", user_id)
    }
}

#[async_trait]
impl HandleProvider for UserMemoryProvider {
    type Handle = Arc<UserMemory>;

    async fn open(&self, user_id: &str) -> SessionResult<Self::Handle> {
        let Some(path) = &self.database_path else {
            return Err(ProviderError::Configuration(
                "memory database path is not configured".to_string(),
            ));
        };

        debug!(user_id = %user_id, path = %path.display(), "Opening user memory store");
        let store = UserMemory::open(path, Self::namespace(user_id))
            .map_err(|e| ProviderError::Open(e.to_string()))?;
        Ok(Arc::new(store))
    }

    async fn close(&self, handle: Self::Handle) -> SessionResult<()> {
        handle.close().map_err(|e| ProviderError::Close(e.to_string()))
    }
}

//! Session runner bridging the conversational runtime to the tool set.
//!
//! One [`Assistant`] serves the whole process. Each conversational session
//! begins with metadata naming the user and their access token; the runner
//! sweeps idle sessions, warms the user's memory handle, and then answers
//! tool requests one string at a time.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use taliesin_services::{GoogleServices, ServicesConfig};
use taliesin_session::{CacheConfig, SessionCache};

use crate::error::{AgentError, Result};
use crate::provider::UserMemoryProvider;
use crate::tool::{ToolContext, ToolRegistry};
use crate::tools::default_registry;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Metadata a conversational session begins with.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    /// The user whose session this is.
    #[serde(default)]
    pub user_id: String,
    /// Bearer token forwarded to the productivity services.
    #[serde(default)]
    pub access_token: String,
}

impl SessionRequest {
    /// Create a request directly.
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Parse session metadata JSON, refusing missing or empty fields.
    pub fn from_metadata(metadata: &str) -> Result<Self> {
        let request: SessionRequest = serde_json::from_str(metadata)?;
        if request.user_id.is_empty() {
            return Err(AgentError::Metadata("missing user_id".to_string()));
        }
        if request.access_token.is_empty() {
            return Err(AgentError::Metadata("missing access_token".to_string()));
        }
        Ok(request)
    }
}

/// One tool invocation from the conversational runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Name of the tool to invoke.
    pub tool: String,
    /// Arguments object handed to the tool.
    #[serde(default)]
    pub arguments: Value,
}

// ─────────────────────────────────────────────────────────────────────────────
// Assistant
// ─────────────────────────────────────────────────────────────────────────────

/// The assistant backend: session registry, services client, and tool set.
pub struct Assistant {
    sessions: SessionCache<UserMemoryProvider>,
    services: Arc<GoogleServices>,
    registry: ToolRegistry,
}

impl Assistant {
    /// Build the assistant from its provider and client configurations.
    pub fn new(
        provider: UserMemoryProvider,
        cache_config: CacheConfig,
        services_config: ServicesConfig,
    ) -> Result<Self> {
        let sessions = SessionCache::new(provider, cache_config);
        let services = Arc::new(GoogleServices::new(services_config)?);
        let registry = default_registry();

        Ok(Self {
            sessions,
            services,
            registry,
        })
    }

    /// The shared session registry.
    pub fn sessions(&self) -> &SessionCache<UserMemoryProvider> {
        &self.sessions
    }

    /// The registered tool set.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Begin a session from raw metadata JSON.
    ///
    /// Bad metadata refuses the session before any cache activity.
    pub async fn begin_from_metadata(&self, metadata: &str) -> Result<ToolContext> {
        match SessionRequest::from_metadata(metadata) {
            Ok(request) => self.begin(request).await,
            Err(err) => {
                error!(error = %err, "Refusing session: bad metadata");
                Err(err)
            }
        }
    }

    /// Begin a session: sweep idle entries, then warm the user's handle.
    ///
    /// A provider failure here fails this session, not the process; the
    /// registry is left without an entry for the user.
    pub async fn begin(&self, request: SessionRequest) -> Result<ToolContext> {
        let swept = self.sessions.sweep().await;
        if swept > 0 {
            info!(count = swept, "Pre-session sweep evicted idle sessions");
        }

        self.sessions.get_or_create(&request.user_id).await?;
        info!(user_id = %request.user_id, "Session started");

        Ok(ToolContext::new(
            request.user_id,
            request.access_token,
            self.sessions.clone(),
            Arc::clone(&self.services),
        ))
    }

    /// Answer one `{"tool": ..., "arguments": ...}` request with a string.
    ///
    /// Malformed requests come back as descriptive strings; a request never
    /// escalates into a crashed turn.
    pub async fn handle_request(&self, ctx: &ToolContext, line: &str) -> String {
        let request: ToolRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => return format!("Invalid tool request: {}", err),
        };

        self.registry
            .dispatch(&request.tool, request.arguments, ctx)
            .await
    }

    /// Drain the session registry, closing every live handle.
    pub async fn shutdown(&self) -> usize {
        let closed = self.sessions.close_all().await;
        info!(count = closed, "Assistant shut down");
        closed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

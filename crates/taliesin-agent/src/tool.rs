//! Tool abstraction for the assistant.
//!
//! Tools are the only bridge between the conversational runtime and the
//! assistant's backends. Each tool declares a name, a description, and a
//! JSON schema for its parameters, and executes against a per-session
//! [`ToolContext`]. Execution is infallible by construction: every outcome,
//! including failure, is a [`ToolResult`] that renders to a plain string, so
//! a misbehaving tool can never crash the conversational turn that called it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use taliesin_services::GoogleServices;
use taliesin_session::SessionCache;

use crate::provider::UserMemoryProvider;

// ─────────────────────────────────────────────────────────────────────────────
// Tool Context
// ─────────────────────────────────────────────────────────────────────────────

/// Per-session state shared by every tool invocation.
///
/// The context pins the session to one user and one access token, and hands
/// tools the shared session cache and services client. Memory tools resolve
/// the user's handle through [`SessionCache::get_or_create`]; productivity
/// tools touch the entry to keep the session live.
#[derive(Clone)]
pub struct ToolContext {
    /// The user this session belongs to.
    pub user_id: String,
    /// Bearer token forwarded to the productivity services.
    pub access_token: String,
    /// Shared registry of per-user memory sessions.
    pub sessions: SessionCache<UserMemoryProvider>,
    /// Shared client for mail, calendar, and task services.
    pub services: Arc<GoogleServices>,
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl ToolContext {
    /// Create a context for one user's session.
    pub fn new(
        user_id: impl Into<String>,
        access_token: impl Into<String>,
        sessions: SessionCache<UserMemoryProvider>,
        services: Arc<GoogleServices>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            sessions,
            services,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Result
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResult {
    /// Plain text output.
    Text {
        /// The text content.
        content: String,
    },
    /// Structured JSON output.
    Json {
        /// The JSON content.
        content: Value,
    },
    /// The tool failed; the message is already phrased for the user.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl ToolResult {
    /// Create a text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create a JSON result.
    pub fn json(content: Value) -> Self {
        Self::Json { content }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Check if this result is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Render the single string handed back to the conversational runtime.
    ///
    /// Error messages are already user-facing, so they pass through without
    /// any added prefix.
    pub fn render(&self) -> String {
        match self {
            Self::Text { content } => content.clone(),
            Self::Json { content } => serde_json::to_string_pretty(content)
                .unwrap_or_else(|_| content.to_string()),
            Self::Error { message } => message.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A capability the conversational runtime can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used to dispatch requests to this tool.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON schema describing the tool's parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given parameters.
    ///
    /// Implementations report failure through [`ToolResult::Error`] rather
    /// than a `Result`; there is deliberately no error channel here.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of available tools, keyed by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check whether a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Names of all registered tools.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name and render its outcome.
    ///
    /// Unknown tools and failed executions both come back as descriptive
    /// strings, so a dispatch never escalates into a crashed turn.
    pub async fn dispatch(&self, name: &str, params: Value, ctx: &ToolContext) -> String {
        let Some(tool) = self.get(name) else {
            debug!(tool = %name, "Unknown tool requested");
            return format!("Unknown tool: {}", name);
        };

        debug!(tool = %name, user_id = %ctx.user_id, "Dispatching tool call");
        let result = tool.execute(params, ctx).await;
        if result.is_error() {
            warn!(tool = %name, user_id = %ctx.user_id, "Tool call failed");
        }
        result.render()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

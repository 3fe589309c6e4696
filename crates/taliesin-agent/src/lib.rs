//! Assistant core for Taliesin.
//!
//! This crate provides the tool framework, the per-user memory provider, and
//! the session runner that bridge a conversational runtime to the user's
//! memories and productivity services.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Assistant                                                  │
//! │  - Begins sessions from metadata (sweep, then warm)         │
//! │  - Dispatches tool requests through the registry            │
//! │  - Answers every request with exactly one string            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!       ┌───────────┐   ┌────────────┐   ┌────────────┐
//!       │ToolRegistry│  │SessionCache│   │GoogleSvcs  │
//!       │ (10 tools) │  │ (memory)   │   │ (reqwest)  │
//!       └───────────┘   └────────────┘   └────────────┘
//! ```
//!
//! # Core Components
//!
//! - [`Assistant`]: Session runner owning the registry, cache, and client
//! - [`Tool`] / [`ToolRegistry`]: The capability surface and its dispatcher
//! - [`ToolResult`]: Infallible execution outcome, rendered to one string
//! - [`UserMemoryProvider`]: Opens per-user memory stores for the cache

pub mod assistant;
pub mod error;
pub mod provider;
pub mod tool;
pub mod tools;

// Re-export core types
pub use error::{AgentError, Result};

// Re-export the session runner
pub use assistant::{Assistant, SessionRequest, ToolRequest};

// Re-export tool types
pub use tool::{Tool, ToolContext, ToolRegistry, ToolResult};

// Re-export the memory provider
pub use provider::UserMemoryProvider;

// Re-export built-in tools
pub use tools::{
    CompleteTaskTool, CreateCalendarEventTool, CreateTaskTool, EssentialInfoTool,
    ListCalendarEventsTool, ListEmailsTool, ListTasksTool, MarkEmailReadTool, SaveMemoryTool,
    SearchMemoryTool, default_registry,
};

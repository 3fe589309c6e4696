//! Built-in tools for the assistant.
//!
//! This module provides the tools that give the assistant its capabilities:
//! - Memory (search, essential-info summary, save)
//! - Gmail (list inbox, mark as read)
//! - Calendar (list events, create event)
//! - Tasks (list, create, complete)
//!
//! Memory tools resolve the user's handle through the session cache,
//! creating the session on first use; productivity tools touch the entry to
//! keep the session live and then call the services client.

mod calendar;
mod email;
mod memory;
mod tasks;

use crate::tool::ToolRegistry;

// Memory tools
pub use memory::{EssentialInfoTool, SaveMemoryTool, SearchMemoryTool};

// Gmail tools
pub use email::{ListEmailsTool, MarkEmailReadTool};

// Calendar tools
pub use calendar::{CreateCalendarEventTool, ListCalendarEventsTool};

// Task tools
pub use tasks::{CompleteTaskTool, CreateTaskTool, ListTasksTool};

/// Registry holding the assistant's full tool set.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(SearchMemoryTool);
    registry.register(EssentialInfoTool);
    registry.register(SaveMemoryTool);
    registry.register(ListEmailsTool);
    registry.register(MarkEmailReadTool);
    registry.register(ListCalendarEventsTool);
    registry.register(CreateCalendarEventTool);
    registry.register(ListTasksTool);
    registry.register(CreateTaskTool);
    registry.register(CompleteTaskTool);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_full_tool_set() {
        let registry = default_registry();
        assert_eq!(registry.len(), 10);

        for name in [
            "search_memory",
            "get_essential_info",
            "save_memory",
            "list_emails",
            "mark_email_as_read",
            "list_calendar_events",
            "create_calendar_event",
            "list_tasks",
            "create_task",
            "complete_task",
        ] {
            assert!(registry.contains(name), "missing tool: {name}");
        }
    }

    #[test]
    fn test_every_tool_declares_an_object_schema() {
        let registry = default_registry();
        for name in registry.names() {
            let tool = registry.get(name).unwrap();
            let schema = tool.parameters();
            assert_eq!(schema["type"], "object", "schema of {name}");
            assert!(schema["properties"].is_object(), "properties of {name}");
            assert!(!tool.description().is_empty(), "description of {name}");
        }
    }
}

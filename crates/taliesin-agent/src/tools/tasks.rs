//! Task tools: listing, creating, and completing tasks.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tool::{Tool, ToolContext, ToolResult};

// ─────────────────────────────────────────────────────────────────────────────
// List Tasks Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool listing the titles of the user's incomplete tasks.
#[derive(Debug, Clone, Default)]
pub struct ListTasksTool;

#[async_trait]
impl Tool for ListTasksTool {
    fn name(&self) -> &str {
        "list_tasks"
    }

    fn description(&self) -> &str {
        "List the titles of the user's incomplete tasks."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> ToolResult {
        ctx.sessions.touch(&ctx.user_id).await;

        match ctx.services.list_tasks(&ctx.access_token).await {
            Ok(tasks) => {
                let titles: Vec<&str> = tasks
                    .iter()
                    .filter(|t| !t.completed)
                    .map(|t| t.title.as_str())
                    .collect();
                ToolResult::json(json!(titles))
            }
            Err(err) => ToolResult::error(format!("Failed to list tasks: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Create Task Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool adding a task to the user's default task list.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskTool;

#[async_trait]
impl Tool for CreateTaskTool {
    fn name(&self) -> &str {
        "create_task"
    }

    fn description(&self) -> &str {
        "Add a task to the user's task list."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Title of the task"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(title) = params.get("title").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'title'");
        };

        ctx.sessions.touch(&ctx.user_id).await;

        match ctx.services.create_task(&ctx.access_token, title).await {
            Ok(task) => ToolResult::text(format!("Task '{}' created.", task.title)),
            Err(err) => ToolResult::error(format!("Failed to create task: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Complete Task Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool marking one of the user's tasks as completed.
#[derive(Debug, Clone, Default)]
pub struct CompleteTaskTool;

#[async_trait]
impl Tool for CompleteTaskTool {
    fn name(&self) -> &str {
        "complete_task"
    }

    fn description(&self) -> &str {
        "Mark one of the user's tasks as completed."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {
                    "type": "string",
                    "description": "Identifier of the task to complete"
                }
            },
            "required": ["task_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(task_id) = params.get("task_id").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'task_id'");
        };

        ctx.sessions.touch(&ctx.user_id).await;

        match ctx.services.complete_task(&ctx.access_token, task_id).await {
            Ok(task) => ToolResult::text(format!("Task '{}' completed.", task.title)),
            Err(err) => ToolResult::error(format!("Failed to complete task: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use taliesin_services::{GoogleServices, ServicesConfig};
    use taliesin_session::{CacheConfig, SessionCache};

    use crate::provider::UserMemoryProvider;

    fn unreachable_context() -> ToolContext {
        let provider = UserMemoryProvider::new(None);
        let sessions = SessionCache::new(provider, CacheConfig::new());
        let config = ServicesConfig::new()
            .with_tasks_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let services = Arc::new(GoogleServices::new(config).unwrap());
        ToolContext::new("user-7", "token", sessions, services)
    }

    #[test]
    fn test_task_tool_metadata() {
        assert_eq!(ListTasksTool.name(), "list_tasks");
        assert_eq!(CreateTaskTool.name(), "create_task");
        assert_eq!(CompleteTaskTool.name(), "complete_task");
        assert_eq!(CreateTaskTool.parameters()["required"], json!(["title"]));
        assert_eq!(
            CompleteTaskTool.parameters()["required"],
            json!(["task_id"])
        );
    }

    #[tokio::test]
    async fn test_list_tasks_service_failure() {
        let ctx = unreachable_context();

        let result = ListTasksTool.execute(json!({}), &ctx).await;
        assert!(result.is_error());
        assert!(result.render().starts_with("Failed to list tasks:"));
    }

    #[tokio::test]
    async fn test_create_task_missing_title() {
        let ctx = unreachable_context();

        let result = CreateTaskTool.execute(json!({}), &ctx).await;
        assert_eq!(result.render(), "Missing required argument 'title'");
    }

    #[tokio::test]
    async fn test_complete_task_missing_task_id() {
        let ctx = unreachable_context();

        let result = CompleteTaskTool.execute(json!({}), &ctx).await;
        assert_eq!(result.render(), "Missing required argument 'task_id'");
    }

    #[tokio::test]
    async fn test_complete_task_service_failure() {
        let ctx = unreachable_context();

        let result = CompleteTaskTool
            .execute(json!({"task_id": "task-1"}), &ctx)
            .await;
        assert!(result.is_error());
        assert!(result.render().starts_with("Failed to complete task:"));
    }
}

//! Gmail tools: inbox listing and mark-as-read.
//!
//! Both touch the user's session entry before calling the service, so a
//! conversation that only handles mail still counts as activity.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tool::{Tool, ToolContext, ToolResult};

// ─────────────────────────────────────────────────────────────────────────────
// List Emails Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool listing the subjects of the user's most recent inbox messages.
#[derive(Debug, Clone, Default)]
pub struct ListEmailsTool;

#[async_trait]
impl Tool for ListEmailsTool {
    fn name(&self) -> &str {
        "list_emails"
    }

    fn description(&self) -> &str {
        "List the subjects of the most recent emails in the user's inbox."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> ToolResult {
        ctx.sessions.touch(&ctx.user_id).await;

        match ctx.services.list_emails(&ctx.access_token).await {
            Ok(emails) => {
                let subjects: Vec<&str> = emails.iter().map(|e| e.subject.as_str()).collect();
                ToolResult::json(json!(subjects))
            }
            Err(err) => ToolResult::error(format!("Failed to list emails: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mark Email Read Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool marking one inbox message as read.
#[derive(Debug, Clone, Default)]
pub struct MarkEmailReadTool;

#[async_trait]
impl Tool for MarkEmailReadTool {
    fn name(&self) -> &str {
        "mark_email_as_read"
    }

    fn description(&self) -> &str {
        "Mark an email in the user's inbox as read."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message_id": {
                    "type": "string",
                    "description": "Identifier of the message to mark as read"
                }
            },
            "required": ["message_id"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(message_id) = params.get("message_id").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'message_id'");
        };

        ctx.sessions.touch(&ctx.user_id).await;

        match ctx
            .services
            .mark_email_as_read(&ctx.access_token, message_id)
            .await
        {
            Ok(()) => ToolResult::text("Email marked as read."),
            Err(_) => ToolResult::error("Failed to mark email as read."),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

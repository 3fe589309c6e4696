//! Calendar tools: upcoming events and all-day event creation.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::tool::{Tool, ToolContext, ToolResult};

// ─────────────────────────────────────────────────────────────────────────────
// List Calendar Events Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool listing the user's upcoming calendar events.
#[derive(Debug, Clone, Default)]
pub struct ListCalendarEventsTool;

#[async_trait]
impl Tool for ListCalendarEventsTool {
    fn name(&self) -> &str {
        "list_calendar_events"
    }

    fn description(&self) -> &str {
        "List the user's upcoming calendar events with their titles and dates."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> ToolResult {
        ctx.sessions.touch(&ctx.user_id).await;

        match ctx.services.list_calendar_events(&ctx.access_token).await {
            Ok(events) => {
                let entries: Vec<Value> = events
                    .iter()
                    .map(|e| json!({"title": e.title, "date": e.date}))
                    .collect();
                ToolResult::json(Value::Array(entries))
            }
            Err(err) => ToolResult::error(format!("Failed to list calendar events: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Create Calendar Event Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool creating an all-day event on the user's primary calendar.
#[derive(Debug, Clone, Default)]
pub struct CreateCalendarEventTool;

#[async_trait]
impl Tool for CreateCalendarEventTool {
    fn name(&self) -> &str {
        "create_calendar_event"
    }

    fn description(&self) -> &str {
        "Create an all-day event on the user's primary calendar."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Title of the event"
                },
                "date": {
                    "type": "string",
                    "description": "Date of the event in YYYY-MM-DD format"
                }
            },
            "required": ["title", "date"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(title) = params.get("title").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'title'");
        };
        let Some(date) = params.get("date").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'date'");
        };

        ctx.sessions.touch(&ctx.user_id).await;

        match ctx
            .services
            .create_calendar_event(&ctx.access_token, title, date)
            .await
        {
            Ok(event) => ToolResult::text(format!("Event '{}' created.", event.title)),
            Err(err) => ToolResult::error(format!("Failed to create calendar event: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

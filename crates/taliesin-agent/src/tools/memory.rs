//! Memory tools: search, essential-info summary, and save.
//!
//! All three resolve the user's memory handle through the session cache,
//! creating the session on first use. Cache and store failures come back as
//! descriptive strings so the conversational turn always gets an answer.

use async_trait::async_trait;
use serde_json::{Value, json};

use taliesin_memory::MemoryRecord;

use crate::tool::{Tool, ToolContext, ToolResult};

/// How many records a search reply carries.
const SEARCH_LIMIT: usize = 3;

/// How many records a category lookup considers before query filtering.
const CATEGORY_LIMIT: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Search Memory Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool for searching the user's saved memories.
#[derive(Debug, Clone, Default)]
pub struct SearchMemoryTool;

#[async_trait]
impl Tool for SearchMemoryTool {
    fn name(&self) -> &str {
        "search_memory"
    }

    fn description(&self) -> &str {
        "Search the user's saved memories for relevant information. Optionally restrict the search to one category."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to find relevant memories"
                },
                "category": {
                    "type": "string",
                    "description": "Restrict the search to memories in this category"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(query) = params.get("query").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'query'");
        };
        let category = params.get("category").and_then(|v| v.as_str());

        let memory = match ctx.sessions.get_or_create(&ctx.user_id).await {
            Ok(memory) => memory,
            Err(err) => return ToolResult::error(format!("Memory search error: {}", err)),
        };

        let found = match category {
            Some(category) => memory
                .search_by_category(category, CATEGORY_LIMIT)
                .map(|records| filter_by_query(records, query)),
            None => memory.search(query, SEARCH_LIMIT),
        };

        match found {
            Ok(records) if records.is_empty() => ToolResult::text("No relevant memories found"),
            Ok(records) => match serde_json::to_value(&records) {
                Ok(content) => ToolResult::json(content),
                Err(err) => ToolResult::error(format!("Memory search error: {}", err)),
            },
            Err(err) => ToolResult::error(format!("Memory search error: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Essential Info Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool summarizing the essential facts saved about the user.
#[derive(Debug, Clone, Default)]
pub struct EssentialInfoTool;

#[async_trait]
impl Tool for EssentialInfoTool {
    fn name(&self) -> &str {
        "get_essential_info"
    }

    fn description(&self) -> &str {
        "Get the essential information saved about the user, such as their name, preferences, and important facts."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> ToolResult {
        let memory = match ctx.sessions.get_or_create(&ctx.user_id).await {
            Ok(memory) => memory,
            Err(err) => {
                return ToolResult::error(format!("Error getting essential info: {}", err));
            }
        };

        match memory.essential(10) {
            Ok(records) if records.is_empty() => {
                ToolResult::text("No essential information available yet.")
            }
            Ok(records) => {
                let lines: Vec<String> = records
                    .iter()
                    .take(5)
                    .map(|r| format!("- {}", r.content))
                    .collect();
                ToolResult::text(format!(
                    "Essential information about you:\n{}",
                    lines.join("\n")
                ))
            }
            Err(err) => ToolResult::error(format!("Error getting essential info: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Memory Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Tool that records a new memory for the user.
#[derive(Debug, Clone, Default)]
pub struct SaveMemoryTool;

#[async_trait]
impl Tool for SaveMemoryTool {
    fn name(&self) -> &str {
        "save_memory"
    }

    fn description(&self) -> &str {
        "Save a piece of information to the user's memory. Mark it essential if it should always be available."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The information to remember"
                },
                "category": {
                    "type": "string",
                    "description": "Optional category to file the memory under"
                },
                "essential": {
                    "type": "boolean",
                    "description": "Whether this is essential information about the user. Defaults to false.",
                    "default": false
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(content) = params.get("content").and_then(|v| v.as_str()) else {
            return ToolResult::error("Missing required argument 'content'");
        };
        let category = params
            .get("category")
            .and_then(|v| v.as_str())
            .map(String::from);
        let essential = params
            .get("essential")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let memory = match ctx.sessions.get_or_create(&ctx.user_id).await {
            Ok(memory) => memory,
            Err(err) => return ToolResult::error(format!("Error saving memory: {}", err)),
        };

        match memory.record(content, category, essential) {
            Ok(_) => ToolResult::text("Memory saved."),
            Err(err) => ToolResult::error(format!("Error saving memory: {}", err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Keep category hits whose content mentions the query, newest first.
fn filter_by_query(records: Vec<MemoryRecord>, query: &str) -> Vec<MemoryRecord> {
    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.content.to_lowercase().contains(&needle))
        .take(SEARCH_LIMIT)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use tempfile::TempDir;

    use taliesin_services::{GoogleServices, ServicesConfig};
    use taliesin_session::{CacheConfig, SessionCache};

    use crate::provider::UserMemoryProvider;

    fn context_with_store(dir: &TempDir) -> ToolContext {
        let provider = UserMemoryProvider::new(Some(dir.path().join("memories.db")));
        let sessions = SessionCache::new(provider, CacheConfig::new());
        let services = Arc::new(GoogleServices::new(ServicesConfig::new()).unwrap());
        ToolContext::new("user-7", "token", sessions, services)
    }

    fn context_without_store() -> ToolContext {
        let provider = UserMemoryProvider::new(None);
        let sessions = SessionCache::new(provider, CacheConfig::new());
        let services = Arc::new(GoogleServices::new(ServicesConfig::new()).unwrap());
        ToolContext::new("user-7", "token", sessions, services)
    }

    #[test]
    fn test_memory_tool_metadata() {
        let search = SearchMemoryTool;
        assert_eq!(search.name(), "search_memory");
        assert_eq!(search.parameters()["required"], json!(["query"]));

        let essential = EssentialInfoTool;
        assert_eq!(essential.name(), "get_essential_info");

        let save = SaveMemoryTool;
        assert_eq!(save.name(), "save_memory");
        assert_eq!(save.parameters()["required"], json!(["content"]));
    }

    #[tokio::test]
    async fn test_save_then_search_round_trip() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        let saved = SaveMemoryTool
            .execute(json!({"content": "likes jasmine tea"}), &ctx)
            .await;
        assert_eq!(saved.render(), "Memory saved.");

        let found = SearchMemoryTool
            .execute(json!({"query": "jasmine"}), &ctx)
            .await;
        assert!(!found.is_error());
        assert!(found.render().contains("likes jasmine tea"));
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        let result = SearchMemoryTool
            .execute(json!({"query": "nonexistent"}), &ctx)
            .await;
        assert_eq!(result.render(), "No relevant memories found");
    }

    #[tokio::test]
    async fn test_search_by_category_filters_on_query() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        SaveMemoryTool
            .execute(
                json!({"content": "allergic to peanuts", "category": "health"}),
                &ctx,
            )
            .await;
        SaveMemoryTool
            .execute(
                json!({"content": "runs every morning", "category": "health"}),
                &ctx,
            )
            .await;

        let result = SearchMemoryTool
            .execute(json!({"query": "peanuts", "category": "health"}), &ctx)
            .await;
        let rendered = result.render();
        assert!(rendered.contains("allergic to peanuts"));
        assert!(!rendered.contains("runs every morning"));
    }

    #[tokio::test]
    async fn test_search_missing_query() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        let result = SearchMemoryTool.execute(json!({}), &ctx).await;
        assert_eq!(result.render(), "Missing required argument 'query'");
    }

    #[tokio::test]
    async fn test_essential_info_empty() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        let result = EssentialInfoTool.execute(json!({}), &ctx).await;
        assert_eq!(result.render(), "No essential information available yet.");
    }

    #[tokio::test]
    async fn test_essential_info_caps_at_five_lines() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        for i in 0..6 {
            SaveMemoryTool
                .execute(
                    json!({"content": format!("essential fact {}", i), "essential": true}),
                    &ctx,
                )
                .await;
        }

        let rendered = EssentialInfoTool.execute(json!({}), &ctx).await.render();
        assert!(rendered.starts_with("Essential information about you:\n"));
        assert_eq!(rendered.matches("- ").count(), 5);
    }

    #[tokio::test]
    async fn test_save_missing_content() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        let result = SaveMemoryTool.execute(json!({}), &ctx).await;
        assert_eq!(result.render(), "Missing required argument 'content'");
    }

    #[tokio::test]
    async fn test_unconfigured_provider_reports_error_and_keeps_registry_clean() {
        let ctx = context_without_store();

        let result = SearchMemoryTool
            .execute(json!({"query": "anything"}), &ctx)
            .await;
        assert!(result.is_error());
        assert!(result.render().starts_with("Memory search error:"));
        assert!(result.render().contains("not configured"));

        // The failed open must not leave a session behind.
        assert_eq!(ctx.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_memory_tools_share_one_session() {
        let dir = TempDir::new().unwrap();
        let ctx = context_with_store(&dir);

        SaveMemoryTool
            .execute(json!({"content": "first"}), &ctx)
            .await;
        SearchMemoryTool
            .execute(json!({"query": "first"}), &ctx)
            .await;
        EssentialInfoTool.execute(json!({}), &ctx).await;

        assert_eq!(ctx.sessions.len(), 1);
        assert!(ctx.sessions.contains("user-7"));
    }
}

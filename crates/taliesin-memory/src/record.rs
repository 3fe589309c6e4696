//! The stored memory record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One remembered item for a user.
///
/// `essential` marks durable facts about the user (preferences, projects,
/// goals) that the essential-info summary surfaces; ordinary records are
/// only reachable through search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique record id.
    pub id: Uuid,
    /// The remembered text.
    pub content: String,
    /// Optional free-form category (e.g., "preferences", "work").
    pub category: Option<String>,
    /// Whether the record belongs in the essential-info summary.
    pub essential: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Create a new record with a fresh id and the current time.
    pub fn new(content: impl Into<String>, category: Option<String>, essential: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            category,
            essential,
            created_at: Utc::now(),
        }
    }
}

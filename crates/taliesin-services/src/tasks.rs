//! Tasks operations against the user's primary (first) task list.

use serde::Deserialize;
use tracing::debug;

use crate::client::GoogleServices;
use crate::error::{Result, ServiceError};
use crate::types::Task;

impl GoogleServices {
    /// All tasks from the first task list. An account without any task
    /// list has no tasks.
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>> {
        let Some(list_id) = self.first_task_list(token).await? else {
            return Ok(Vec::new());
        };

        let listing: TaskListing = self
            .request_json(
                self.http()
                    .get(format!(
                        "{}/lists/{}/tasks",
                        self.config().tasks_base_url,
                        list_id
                    ))
                    .bearer_auth(token),
            )
            .await?;

        debug!(count = listing.items.len(), "Listed tasks");
        Ok(listing.items.into_iter().map(task_to_task).collect())
    }

    /// Create a task in the first task list.
    pub async fn create_task(&self, token: &str, title: &str) -> Result<Task> {
        let list_id = self
            .first_task_list(token)
            .await?
            .ok_or(ServiceError::NoTaskList)?;

        let created: TaskDetail = self
            .request_json(
                self.http()
                    .post(format!(
                        "{}/lists/{}/tasks",
                        self.config().tasks_base_url,
                        list_id
                    ))
                    .bearer_auth(token)
                    .json(&serde_json::json!({ "title": title })),
            )
            .await?;

        debug!(id = %created.id, "Created task");
        Ok(task_to_task(created))
    }

    /// Mark a task complete, returning the updated task.
    pub async fn complete_task(&self, token: &str, task_id: &str) -> Result<Task> {
        let list_id = self
            .first_task_list(token)
            .await?
            .ok_or(ServiceError::NoTaskList)?;

        let url = format!(
            "{}/lists/{}/tasks/{}",
            self.config().tasks_base_url,
            list_id,
            task_id
        );

        // Fetch, flip the status, send the whole resource back. Updating
        // the raw value keeps fields we don't model.
        let mut task: serde_json::Value = self
            .request_json(self.http().get(&url).bearer_auth(token))
            .await?;
        task["status"] = serde_json::Value::String("completed".to_string());

        let updated: TaskDetail = self
            .request_json(self.http().put(&url).bearer_auth(token).json(&task))
            .await?;

        debug!(id = %updated.id, "Completed task");
        Ok(task_to_task(updated))
    }

    /// The id of the account's first task list, if it has one.
    async fn first_task_list(&self, token: &str) -> Result<Option<String>> {
        let listing: TaskListListing = self
            .request_json(
                self.http()
                    .get(format!("{}/users/@me/lists", self.config().tasks_base_url))
                    .bearer_auth(token)
                    .query(&[("maxResults", "1")]),
            )
            .await?;

        Ok(listing.items.into_iter().next().map(|l| l.id))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TaskListListing {
    #[serde(default)]
    items: Vec<TaskListRef>,
}

#[derive(Debug, Deserialize)]
struct TaskListRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TaskListing {
    #[serde(default)]
    items: Vec<TaskDetail>,
}

#[derive(Debug, Deserialize)]
struct TaskDetail {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: Option<String>,
}

fn task_to_task(detail: TaskDetail) -> Task {
    Task {
        id: detail.id,
        title: detail.title,
        completed: detail.status.as_deref() == Some("completed"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

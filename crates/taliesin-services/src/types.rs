//! Records the productivity APIs reduce to.

use serde::{Deserialize, Serialize};

/// An inbox message, reduced to what the assistant reads aloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Message id.
    pub id: String,
    /// Sender display name (the part before `<addr>` when present).
    pub sender: String,
    /// Subject line, `No Subject` when the header is missing.
    pub subject: String,
    /// The message snippet.
    pub body: String,
    /// Whether the message has been read (no `UNREAD` label).
    pub read: bool,
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event id.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Start, as the API gave it: an RFC 3339 datetime for timed events or
    /// a `YYYY-MM-DD` date for all-day events.
    pub date: String,
}

/// A task from the user's primary task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task id.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Whether the task status is `completed`.
    pub completed: bool,
}

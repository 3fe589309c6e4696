//! Per-user memory storage for Taliesin using SQLite.
//!
//! One shared database file holds every user's memories; each user gets a
//! [`UserMemory`] handle scoped to its own namespace. Handles are opened
//! lazily by the session layer, used for an unbounded number of record and
//! search calls, and closed once when the session cache evicts them.
//!
//! Search is keyword scoring, not semantic: a record's score is the number
//! of query words (longer than two characters) its content contains.

pub mod error;
pub mod record;
pub mod store;

pub use error::{MemoryError, Result};
pub use record::MemoryRecord;
pub use store::UserMemory;

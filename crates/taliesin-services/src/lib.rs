//! Google productivity services client for Taliesin.
//!
//! Thin typed wrappers over the Gmail, Calendar, and Tasks REST APIs. The
//! client holds no credential of its own: every call takes the per-session
//! bearer token the conversational runtime supplies, so one shared
//! [`GoogleServices`] serves all users.
//!
//! Every operation is fallible and returns a [`ServiceError`]; the tool
//! layer above converts failures into user-facing strings.

mod calendar;
mod gmail;
mod tasks;

pub mod client;
pub mod error;
pub mod types;

pub use client::{GoogleServices, ServicesConfig};
pub use error::{Result, ServiceError};
pub use types::{CalendarEvent, Email, Task};

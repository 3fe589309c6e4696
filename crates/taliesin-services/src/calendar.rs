//! Calendar operations: list the next year of events, create all-day events.

use chrono::{Duration, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::client::GoogleServices;
use crate::error::Result;
use crate::types::CalendarEvent;

impl GoogleServices {
    /// Events on the primary calendar from now through one year out,
    /// expanded to single instances and ordered by start time.
    pub async fn list_calendar_events(&self, token: &str) -> Result<Vec<CalendarEvent>> {
        let now = Utc::now();
        let time_min = now.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = (now + Duration::days(365)).to_rfc3339_opts(SecondsFormat::Secs, true);

        let listing: EventListing = self
            .request_json(
                self.http()
                    .get(format!(
                        "{}/calendars/primary/events",
                        self.config().calendar_base_url
                    ))
                    .bearer_auth(token)
                    .query(&[
                        ("timeMin", time_min.as_str()),
                        ("timeMax", time_max.as_str()),
                        ("maxResults", "250"),
                        ("singleEvents", "true"),
                        ("orderBy", "startTime"),
                    ]),
            )
            .await?;

        debug!(count = listing.items.len(), "Listed calendar events");
        Ok(listing.items.into_iter().map(event_to_calendar_event).collect())
    }

    /// Create an all-day event on the primary calendar.
    ///
    /// `date` is `YYYY-MM-DD`.
    pub async fn create_calendar_event(
        &self,
        token: &str,
        title: &str,
        date: &str,
    ) -> Result<CalendarEvent> {
        let body = serde_json::json!({
            "summary": title,
            "start": { "date": date },
            "end": { "date": date },
        });

        let created: EventDetail = self
            .request_json(
                self.http()
                    .post(format!(
                        "{}/calendars/primary/events",
                        self.config().calendar_base_url
                    ))
                    .bearer_auth(token)
                    .json(&body),
            )
            .await?;

        debug!(id = %created.id, "Created calendar event");
        Ok(event_to_calendar_event(created))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EventListing {
    #[serde(default)]
    items: Vec<EventDetail>,
}

#[derive(Debug, Deserialize)]
struct EventDetail {
    id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    start: EventTime,
}

/// Event start: timed events carry `dateTime`, all-day events carry `date`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

fn event_to_calendar_event(detail: EventDetail) -> CalendarEvent {
    let date = detail
        .start
        .date_time
        .or(detail.start.date)
        .unwrap_or_default();

    CalendarEvent {
        id: detail.id,
        title: detail.summary,
        date,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

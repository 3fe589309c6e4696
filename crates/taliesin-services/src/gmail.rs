//! Gmail operations: list recent inbox messages, mark one read.

use serde::Deserialize;
use tracing::debug;

use crate::client::GoogleServices;
use crate::error::Result;
use crate::types::Email;

/// How many recent messages a listing fetches.
const MAX_RESULTS: &str = "20";

impl GoogleServices {
    /// The 20 most recent inbox messages, reduced to display form.
    pub async fn list_emails(&self, token: &str) -> Result<Vec<Email>> {
        let base = &self.config().gmail_base_url;
        let listing: MessageListing = self
            .request_json(
                self.http()
                    .get(format!("{}/users/me/messages", base))
                    .bearer_auth(token)
                    .query(&[("maxResults", MAX_RESULTS)]),
            )
            .await?;

        let mut emails = Vec::new();
        for message in listing.messages {
            // Metadata format keeps the body out of the payload; we only
            // need the two headers and the snippet.
            let detail: MessageDetail = self
                .request_json(
                    self.http()
                        .get(format!("{}/users/me/messages/{}", base, message.id))
                        .bearer_auth(token)
                        .query(&[
                            ("format", "metadata"),
                            ("metadataHeaders", "Subject"),
                            ("metadataHeaders", "From"),
                        ]),
                )
                .await?;
            emails.push(message_to_email(detail));
        }

        debug!(count = emails.len(), "Listed inbox messages");
        Ok(emails)
    }

    /// Mark a message read by removing its `UNREAD` label.
    pub async fn mark_email_as_read(&self, token: &str, message_id: &str) -> Result<()> {
        let url = format!(
            "{}/users/me/messages/{}/modify",
            self.config().gmail_base_url,
            message_id
        );
        let body = serde_json::json!({ "removeLabelIds": ["UNREAD"] });

        let _: serde_json::Value = self
            .request_json(self.http().post(url).bearer_auth(token).json(&body))
            .await?;

        debug!(%message_id, "Marked message read");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

/// `users/me/messages` listing. Gmail omits `messages` entirely when the
/// inbox is empty.
#[derive(Debug, Deserialize)]
struct MessageListing {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDetail {
    id: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    label_ids: Vec<String>,
    #[serde(default)]
    payload: MessagePayload,
}

#[derive(Debug, Default, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<MessageHeader>,
}

#[derive(Debug, Deserialize)]
struct MessageHeader {
    name: String,
    value: String,
}

fn message_to_email(detail: MessageDetail) -> Email {
    let subject = header_value(&detail.payload.headers, "Subject")
        .unwrap_or_else(|| "No Subject".to_string());
    let sender = header_value(&detail.payload.headers, "From")
        .unwrap_or_else(|| "Unknown Sender".to_string());
    let read = !detail.label_ids.iter().any(|l| l == "UNREAD");

    Email {
        id: detail.id,
        sender: display_name(&sender),
        subject,
        body: detail.snippet,
        read,
    }
}

fn header_value(headers: &[MessageHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.clone())
}

/// Reduce a `Name <addr>` sender header to the display name.
fn display_name(sender: &str) -> String {
    match sender.split_once('<') {
        Some((name, _)) => name.trim().to_string(),
        None => sender.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_to_email() {
        let detail: MessageDetail = serde_json::from_str(
            r#"{
                "id": "msg-1",
                "snippet": "See you at noon",
                "labelIds": ["INBOX", "UNREAD"],
                "payload": {
                    "headers": [
                        {"name": "Subject", "value": "Lunch?"},
                        {"name": "From", "value": "Ada Lovelace <ada@example.com>"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let email = message_to_email(detail);
        assert_eq!(email.id, "msg-1");
        assert_eq!(email.sender, "Ada Lovelace");
        assert_eq!(email.subject, "Lunch?");
        assert_eq!(email.body, "See you at noon");
        assert!(!email.read);
    }

    #[test]
    fn test_message_without_unread_label_is_read() {
        let detail: MessageDetail = serde_json::from_str(
            r#"{
                "id": "msg-2",
                "snippet": "",
                "labelIds": ["INBOX"],
                "payload": {"headers": [{"name": "Subject", "value": "Done"}]}
            }"#,
        )
        .unwrap();

        assert!(message_to_email(detail).read);
    }

    #[test]
    fn test_missing_headers_fall_back() {
        let detail: MessageDetail =
            serde_json::from_str(r#"{"id": "msg-3", "payload": {"headers": []}}"#).unwrap();

        let email = message_to_email(detail);
        assert_eq!(email.subject, "No Subject");
        assert_eq!(email.sender, "Unknown Sender");
        assert_eq!(email.body, "");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Ada Lovelace <ada@example.com>"), "Ada Lovelace");
        assert_eq!(display_name("ada@example.com"), "ada@example.com");
        // A bare bracketed address has no name part
        assert_eq!(display_name("<ada@example.com>"), "");
    }

    #[test]
    fn test_empty_listing_parses() {
        let listing: MessageListing = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert!(listing.messages.is_empty());
    }
}

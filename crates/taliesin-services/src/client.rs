//! The shared HTTP client and its configuration.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::{Result, ServiceError};

/// Default Gmail API base URL.
const DEFAULT_GMAIL_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// Default Calendar API base URL.
const DEFAULT_CALENDAR_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default Tasks API base URL.
const DEFAULT_TASKS_BASE: &str = "https://tasks.googleapis.com/tasks/v1";

/// Default timeout for requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the services client.
#[derive(Debug, Clone)]
pub struct ServicesConfig {
    /// Gmail API base URL.
    pub gmail_base_url: String,

    /// Calendar API base URL.
    pub calendar_base_url: String,

    /// Tasks API base URL.
    pub tasks_base_url: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl ServicesConfig {
    /// Create a config pointing at the public Google endpoints.
    pub fn new() -> Self {
        Self {
            gmail_base_url: DEFAULT_GMAIL_BASE.to_string(),
            calendar_base_url: DEFAULT_CALENDAR_BASE.to_string(),
            tasks_base_url: DEFAULT_TASKS_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom Gmail base URL.
    pub fn with_gmail_base_url(mut self, url: impl Into<String>) -> Self {
        self.gmail_base_url = url.into();
        self
    }

    /// Set a custom Calendar base URL.
    pub fn with_calendar_base_url(mut self, url: impl Into<String>) -> Self {
        self.calendar_base_url = url.into();
        self
    }

    /// Set a custom Tasks base URL.
    pub fn with_tasks_base_url(mut self, url: impl Into<String>) -> Self {
        self.tasks_base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the Google productivity APIs.
///
/// Credentials are per-call, not per-client: every method takes the bearer
/// token carried by the calling session.
pub struct GoogleServices {
    client: Client,
    config: ServicesConfig,
}

impl GoogleServices {
    /// Create a new client with the given configuration.
    pub fn new(config: ServicesConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// The client configuration.
    pub fn config(&self) -> &ServicesConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Send a request and decode the JSON body, mapping non-success
    /// statuses to [`ServiceError::Api`].
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await?;
        Self::handle_response(response).await
    }

    /// Decode a successful response, or turn an error response into a
    /// [`ServiceError`].
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    /// Handle an error response.
    async fn handle_error_response(response: Response) -> ServiceError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        map_error_body(status, &body)
    }
}

/// Map a non-success status and body to a [`ServiceError`], preferring the
/// message inside Google's standard error envelope.
fn map_error_body(status: u16, body: &str) -> ServiceError {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorBody>(body) {
        ServiceError::Api {
            status,
            message: envelope.error.message,
        }
    } else {
        ServiceError::Api {
            status,
            message: if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body.to_string()
            },
        }
    }
}

/// Google's standard error envelope: `{"error": {"message": ...}}`.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

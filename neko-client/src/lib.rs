//! Neko HTTP Client
//!
//! A small, typed HTTP client for the Neko server API.
//!
//! # Example
//!
//! ```no_run
//! use neko_client::NekoClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), neko_client::ClientError> {
//!     let client = NekoClient::new("http://localhost:8982");
//!
//!     let accepted = client.submit_download("https://example.com/watch?v=abc").await?;
//!     println!("Queued job: {}", accepted.job_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod history;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Neko server API
///
/// Methods are grouped by resource:
/// - Downloads and the job queue (submit, get, list, cancel, wait)
/// - History and service info
#[derive(Debug, Clone)]
pub struct NekoClient {
    /// Base URL of the server (e.g., "http://localhost:8982")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl NekoClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use neko_client::NekoClient;
    ///
    /// let client = NekoClient::new("http://localhost:8982");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Error responses are turned into [`ClientError::ApiError`] carrying the
    /// server's `error` message when there is one.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_message(&body)));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Extracts `{"error": "..."}` from an error body, or returns the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

//! HTTP client abstraction for testability.

use std::time::Duration;

/// Default timeout for buffered requests (catalog documents are small).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from buffered HTTP requests.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Buffered HTTP GET.
///
/// This abstraction allows dependency injection: tests substitute canned
/// responses for the network.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request, returning the full response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| HttpError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| HttpError::Request {
                url: url.to_string(),
                reason: format!("failed to read response: {e}"),
            })
    }
}

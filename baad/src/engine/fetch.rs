//! Remote object fetching.
//!
//! The engine talks to the remote object store through the
//! [`ObjectFetcher`] trait so tests can substitute in-memory fakes for
//! the network; [`HttpFetcher`] is the real implementation over
//! `reqwest::blocking`.

use std::io::{Read, Write};
use std::time::Duration;

use super::cancel::CancelToken;

/// Default timeout applied to each HTTP request.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Chunk size for streaming response bodies (64KB).
const CHUNK_SIZE: usize = 64 * 1024;

/// Errors produced while fetching one remote object.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Network or transient I/O hiccup; the task is retryable.
    #[error("transient transfer error for {url}: {reason}")]
    Transient { url: String, reason: String },

    /// 4xx-class response; retrying cannot help. Fatal for the task only.
    #[error("permanent transfer error for {url}: HTTP {status}")]
    Permanent { url: String, status: u16 },

    /// The transfer was cancelled cooperatively.
    #[error("transfer cancelled")]
    Cancelled,
}

/// Streams one remote object into a writer.
pub trait ObjectFetcher: Send + Sync {
    /// Fetch `url`, writing the body to `sink`.
    ///
    /// `on_progress` is invoked with the cumulative byte count after each
    /// chunk. The fetch observes `cancel` between chunks and returns
    /// [`FetchError::Cancelled`] once set. Returns the total byte count
    /// on success.
    fn fetch(
        &self,
        url: &str,
        sink: &mut dyn Write,
        on_progress: &mut dyn FnMut(u64),
        cancel: &CancelToken,
    ) -> Result<u64, FetchError>;
}

/// HTTP object fetcher over `reqwest::blocking`.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
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

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectFetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        sink: &mut dyn Write,
        on_progress: &mut dyn FnMut(u64),
        cancel: &CancelToken,
    ) -> Result<u64, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transient {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_client_error() {
            return Err(FetchError::Permanent {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            // 5xx and other oddities may clear up on retry.
            return Err(FetchError::Transient {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut received = 0u64;

        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            let bytes_read = response.read(&mut buffer).map_err(|e| FetchError::Transient {
                url: url.to_string(),
                reason: format!("read error: {e}"),
            })?;

            if bytes_read == 0 {
                break;
            }

            sink.write_all(&buffer[..bytes_read])
                .map_err(|e| FetchError::Transient {
                    url: url.to_string(),
                    reason: format!("write error: {e}"),
                })?;

            received += bytes_read as u64;
            on_progress(received);
        }

        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_error_display() {
        let err = FetchError::Transient {
            url: "https://example.com/a".to_string(),
            reason: "connection reset".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("transient"));
        assert!(text.contains("connection reset"));
    }

    #[test]
    fn test_permanent_error_display() {
        let err = FetchError::Permanent {
            url: "https://example.com/a".to_string(),
            status: 404,
        };
        assert!(err.to_string().contains("404"));
    }
}

//! Per-task transfer errors.

use std::io;
use std::path::PathBuf;

use super::fetch::FetchError;

/// Error for one transfer attempt. Never aborts the batch; the engine
/// retries or records it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The remote fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Downloaded bytes failed the size/CRC check. Retried like a
    /// transient error (a bad intermediate cache is more likely than a
    /// wrong catalog) but counted separately in the report.
    #[error("integrity mismatch for {name}: {detail}")]
    Integrity { name: String, detail: String },

    /// Local filesystem failure while staging the download.
    #[error("i/o failure at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl TransferError {
    /// Whether the task should be re-queued (up to the attempt bound).
    pub fn is_retryable(&self) -> bool {
        match self {
            TransferError::Fetch(FetchError::Transient { .. }) => true,
            TransferError::Fetch(FetchError::Permanent { .. }) => false,
            TransferError::Fetch(FetchError::Cancelled) => false,
            TransferError::Integrity { .. } => true,
            TransferError::Io { .. } => true,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransferError::Fetch(FetchError::Cancelled))
    }
}

//! Catalog error types.

use std::path::PathBuf;

use crate::net::HttpError;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while fetching or parsing a catalog.
///
/// A malformed manifest is fatal to the whole invocation; nothing can
/// proceed without a usable index.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The manifest document could not be parsed.
    #[error("malformed manifest: {0}")]
    Malformed(String),

    /// A catalog document could not be fetched.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A catalog snapshot could not be read or written.
    #[error("failed to access catalog snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        source: std::io::Error,
    },
}

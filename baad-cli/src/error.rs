//! CLI error type wrapping the library error taxonomy.

use std::fmt;

use baad::catalog::CatalogError;
use baad::extract::ExtractError;
use baad::resolver::ResolveError;

#[derive(Debug)]
pub enum CliError {
    /// Invalid flag combination or value.
    Usage(String),
    Resolve(ResolveError),
    Catalog(CatalogError),
    Extract(ExtractError),
    Io {
        context: String,
        source: std::io::Error,
    },
    /// Interactive prompt failed or was aborted.
    Prompt(dialoguer::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Resolve(e) => write!(f, "cannot resolve catalog url: {e}"),
            CliError::Catalog(e) => write!(f, "cannot load catalog: {e}"),
            CliError::Extract(e) => write!(f, "extraction failed: {e}"),
            CliError::Io { context, source } => write!(f, "{context}: {source}"),
            CliError::Prompt(e) => write!(f, "prompt failed: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Usage(_) => None,
            CliError::Resolve(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Extract(e) => Some(e),
            CliError::Io { source, .. } => Some(source),
            CliError::Prompt(e) => Some(e),
        }
    }
}

impl From<ResolveError> for CliError {
    fn from(e: ResolveError) -> Self {
        CliError::Resolve(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<ExtractError> for CliError {
    fn from(e: ExtractError) -> Self {
        CliError::Extract(e)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e)
    }
}

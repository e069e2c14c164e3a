//! Version and server-info collaborators.
//!
//! The resolver learns two things from upstream: the latest client
//! version (from the notice index) and, for a given version, the
//! catalog root URL (from the version's server-info descriptor). Both
//! are behind traits so the resolver can be exercised without a network.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::net::{HttpClient, HttpError};

/// Errors while resolving the catalog URL for the installed version.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The version or server-info document did not have the expected shape.
    #[error("malformed version descriptor: {0}")]
    MalformedDescriptor(String),
}

/// Determines the currently installed (latest) application version.
pub trait VersionProbe: Send + Sync {
    fn latest_version(&self) -> Result<String, ResolveError>;
}

/// Derives the catalog root URL for a specific version.
pub trait ServerInfoSource: Send + Sync {
    fn catalog_root(&self, version: &str) -> Result<String, ResolveError>;
}

#[derive(Deserialize)]
struct NoticeIndex {
    #[serde(rename = "LatestClientVersion")]
    latest_client_version: String,
}

/// Version probe reading the notice index document.
pub struct HttpVersionProbe {
    http: Arc<dyn HttpClient>,
    url: String,
}

impl HttpVersionProbe {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl VersionProbe for HttpVersionProbe {
    fn latest_version(&self) -> Result<String, ResolveError> {
        let raw = self.http.get(&self.url)?;
        let doc: NoticeIndex = serde_json::from_slice(&raw)
            .map_err(|e| ResolveError::MalformedDescriptor(e.to_string()))?;
        debug!(version = %doc.latest_client_version, "probed latest client version");
        Ok(doc.latest_client_version)
    }
}

#[derive(Deserialize)]
struct ServerInfoDoc {
    #[serde(rename = "ConnectionGroups")]
    connection_groups: Vec<ConnectionGroup>,
}

#[derive(Deserialize)]
struct ConnectionGroup {
    #[serde(rename = "OverrideConnectionGroups", default)]
    override_connection_groups: Vec<OverrideGroup>,
}

#[derive(Deserialize)]
struct OverrideGroup {
    #[serde(rename = "AddressablesCatalogUrlRoot")]
    addressables_catalog_url_root: String,
}

/// Server-info source fetching the version's connection descriptor.
///
/// The catalog root is the last override group of the first connection
/// group, mirroring how the game client itself selects it.
pub struct HttpServerInfoSource {
    http: Arc<dyn HttpClient>,
    /// URL template; `{version}` is substituted.
    url_template: String,
}

impl HttpServerInfoSource {
    pub fn new(http: Arc<dyn HttpClient>, url_template: impl Into<String>) -> Self {
        Self {
            http,
            url_template: url_template.into(),
        }
    }
}

impl ServerInfoSource for HttpServerInfoSource {
    fn catalog_root(&self, version: &str) -> Result<String, ResolveError> {
        let url = self.url_template.replace("{version}", version);
        let raw = self.http.get(&url)?;
        let doc: ServerInfoDoc = serde_json::from_slice(&raw)
            .map_err(|e| ResolveError::MalformedDescriptor(e.to_string()))?;

        let group = doc
            .connection_groups
            .first()
            .ok_or_else(|| ResolveError::MalformedDescriptor("no connection groups".into()))?;
        let root = group
            .override_connection_groups
            .last()
            .ok_or_else(|| {
                ResolveError::MalformedDescriptor("no override connection groups".into())
            })?
            .addressables_catalog_url_root
            .clone();

        debug!(version, root = %root, "derived catalog root");
        Ok(root)
    }
}

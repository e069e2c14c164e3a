//! Catalog URL resolution.
//!
//! Downloads are addressed relative to a versioned catalog root. The
//! resolver produces that root from one of two places: an explicit
//! user-supplied override, or the probed client version combined with
//! the version's server-info descriptor. Derived roots are cached per
//! version so repeated runs against an unchanged version skip the
//! server-info round trip.

mod probe;

use tracing::info;

pub use probe::{
    HttpServerInfoSource, HttpVersionProbe, ResolveError, ServerInfoSource, VersionProbe,
};

/// Base URL for bare patch identifiers containing an underscore.
pub const DEFAULT_PATCH_BASE: &str = "https://prod-clientpatch.bluearchiveyostar.com";

/// A catalog root derived for a specific client version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCatalog {
    pub version: String,
    pub root: String,
}

/// Resolves the catalog root URL, caching per client version.
pub struct CatalogResolver {
    override_url: Option<String>,
    pinned_version: Option<String>,
    patch_base: String,
    probe: Box<dyn VersionProbe>,
    server_info: Box<dyn ServerInfoSource>,
    cached: Option<ResolvedCatalog>,
}

impl CatalogResolver {
    pub fn new(probe: Box<dyn VersionProbe>, server_info: Box<dyn ServerInfoSource>) -> Self {
        Self {
            override_url: None,
            pinned_version: None,
            patch_base: DEFAULT_PATCH_BASE.to_string(),
            probe,
            server_info,
            cached: None,
        }
    }

    /// Uses `url` instead of probing; see [`normalize_override`].
    pub fn with_override(mut self, url: impl Into<String>) -> Self {
        self.override_url = Some(url.into());
        self
    }

    /// Pins the client version, skipping the version probe. The root is
    /// still derived from server info for that version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.pinned_version = Some(version.into());
        self
    }

    pub fn with_patch_base(mut self, base: impl Into<String>) -> Self {
        self.patch_base = base.into();
        self
    }

    /// Seeds the version cache, typically from a previous run's snapshot.
    pub fn with_cached(mut self, cached: ResolvedCatalog) -> Self {
        self.cached = Some(cached);
        self
    }

    pub fn cached(&self) -> Option<&ResolvedCatalog> {
        self.cached.as_ref()
    }

    /// Returns the catalog root URL.
    ///
    /// An explicit override short-circuits everything else, including
    /// the version probe. Otherwise the pinned version, or else the
    /// probed latest, selects the server-info descriptor; the cached
    /// root is reused when the version is unchanged, and `force`
    /// ignores the cache and re-derives from server info.
    pub fn resolve(&mut self, force: bool) -> Result<String, ResolveError> {
        if let Some(url) = &self.override_url {
            return Ok(normalize_override(url, &self.patch_base));
        }

        let version = match &self.pinned_version {
            Some(pinned) => pinned.clone(),
            None => self.probe.latest_version()?,
        };
        if !force {
            if let Some(cached) = &self.cached {
                if cached.version == version {
                    return Ok(cached.root.clone());
                }
            }
        }

        let root = self.server_info.catalog_root(&version)?;
        info!(version = %version, root = %root, "resolved catalog root");
        self.cached = Some(ResolvedCatalog {
            version,
            root: root.clone(),
        });
        Ok(root)
    }
}

/// Normalizes a user-supplied catalog override.
///
/// Full `http(s)://` URLs pass through verbatim. A bare patch id
/// (recognized by a `_` in the name) is joined onto the patch base.
/// Anything else is assumed to be a host and gets an `https://` scheme.
pub fn normalize_override(url: &str, patch_base: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.contains('_') {
        format!("{}/{}", patch_base.trim_end_matches('/'), url)
    } else {
        format!("https://{url}")
    }
}

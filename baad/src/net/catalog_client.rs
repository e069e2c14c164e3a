//! Fetches catalog documents from the resolved catalog root.
//!
//! Upstream serves one document per category. The client fetches all
//! three, merges them into a single manifest document and hands that to
//! [`CatalogIndex::parse`]'s sibling constructor. The merged document is
//! also what gets persisted as the `GameFiles.json` snapshot for offline
//! reuse.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{CatalogError, CatalogIndex, CatalogResult, ManifestDoc};

use super::http::HttpClient;

/// Relative location of the bundle catalog.
const BUNDLE_CATALOG_PATH: &str = "Android/bundleDownloadInfo.json";

/// Relative location of the table catalog.
const TABLE_CATALOG_PATH: &str = "TableBundles/TableCatalog.json";

/// Candidate locations of the media catalog; upstream has moved it
/// between releases, so both are tried in order.
const MEDIA_CATALOG_PATHS: [&str; 2] = [
    "MediaResources/Catalog/MediaCatalog.json",
    "MediaResources/MediaCatalog.json",
];

/// Name of the merged on-disk snapshot.
pub const SNAPSHOT_FILE: &str = "GameFiles.json";

/// Catalog document fetcher.
pub struct CatalogClient {
    http: Arc<dyn HttpClient>,
}

impl CatalogClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Fetch and merge all catalog documents under `root`.
    pub fn fetch_manifest(&self, root: &str) -> CatalogResult<ManifestDoc> {
        info!(root, "fetching catalogs");

        let bundles = self.fetch_doc(root, BUNDLE_CATALOG_PATH)?;
        let tables = self.fetch_doc(root, TABLE_CATALOG_PATH)?;
        let media = self.fetch_media_doc(root)?;

        Ok(bundles.merge(tables).merge(media))
    }

    /// Fetch, merge and index in one step.
    pub fn fetch_index(&self, root: &str) -> CatalogResult<CatalogIndex> {
        CatalogIndex::from_doc(self.fetch_manifest(root)?)
    }

    fn fetch_doc(&self, root: &str, path: &str) -> CatalogResult<ManifestDoc> {
        let url = format!("{}/{}", root.trim_end_matches('/'), path);
        debug!(%url, "fetching catalog document");
        let raw = self.http.get(&url)?;
        serde_json::from_slice(&raw)
            .map_err(|e| CatalogError::Malformed(format!("{path}: {e}")))
    }

    fn fetch_media_doc(&self, root: &str) -> CatalogResult<ManifestDoc> {
        let mut last_err = None;
        for path in MEDIA_CATALOG_PATHS {
            match self.fetch_doc(root, path) {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    debug!(path, error = %e, "media catalog location failed");
                    last_err = Some(e);
                }
            }
        }
        // Both candidates failed; surface the last error.
        Err(last_err.expect("at least one media catalog path"))
    }
}

/// Persist a merged manifest snapshot.
pub fn save_snapshot(path: &Path, doc: &ManifestDoc) -> CatalogResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CatalogError::Snapshot {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let raw = serde_json::to_vec_pretty(doc)
        .map_err(|e| CatalogError::Malformed(e.to_string()))?;
    fs::write(path, raw).map_err(|e| CatalogError::Snapshot {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a previously saved manifest snapshot.
pub fn load_snapshot(path: &Path) -> CatalogResult<CatalogIndex> {
    let raw = fs::read(path).map_err(|e| CatalogError::Snapshot {
        path: path.to_path_buf(),
        source: e,
    })?;
    CatalogIndex::parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::http::tests::MockHttpClient;
    use crate::net::HttpError;
    use tempfile::TempDir;

    const ROOT: &str = "https://cdn.example.com/r70";

    fn mock_with_all() -> MockHttpClient {
        MockHttpClient::new()
            .with_response(
                &format!("{ROOT}/{BUNDLE_CATALOG_PATH}"),
                br#"{"BundleFiles": [{"Name": "a.bundle", "Crc": 1, "Size": 2}]}"#,
            )
            .with_response(
                &format!("{ROOT}/{TABLE_CATALOG_PATH}"),
                br#"{"TableBundles": {"Excel.zip": {"crc": 3, "size": 4}}}"#,
            )
            .with_response(
                &format!("{ROOT}/MediaResources/Catalog/MediaCatalog.json"),
                br#"{"MediaResources": {"v": {"path": "Audio\\a.zip", "crc": 5, "bytes": 6}}}"#,
            )
    }

    #[test]
    fn test_fetch_index_merges_all_categories() {
        let client = CatalogClient::new(Arc::new(mock_with_all()));
        let index = client.fetch_index(ROOT).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_media_catalog_falls_back_to_second_location() {
        let mock = MockHttpClient::new()
            .with_response(
                &format!("{ROOT}/{BUNDLE_CATALOG_PATH}"),
                br#"{"BundleFiles": []}"#,
            )
            .with_response(
                &format!("{ROOT}/{TABLE_CATALOG_PATH}"),
                br#"{"TableBundles": {}}"#,
            )
            .with_error(
                &format!("{ROOT}/MediaResources/Catalog/MediaCatalog.json"),
                HttpError::Status {
                    url: String::new(),
                    status: 404,
                },
            )
            .with_response(
                &format!("{ROOT}/MediaResources/MediaCatalog.json"),
                br#"{"MediaResources": {"v": {"path": "a.zip", "crc": 1, "bytes": 2}}}"#,
            );

        let client = CatalogClient::new(Arc::new(mock));
        let index = client.fetch_index(ROOT).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_malformed_catalog_document_fails() {
        let mock = MockHttpClient::new().with_response(
            &format!("{ROOT}/{BUNDLE_CATALOG_PATH}"),
            b"<html>not json</html>",
        );
        let client = CatalogClient::new(Arc::new(mock));
        assert!(matches!(
            client.fetch_manifest(ROOT),
            Err(CatalogError::Malformed(_))
        ));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jp/1.2.3").join(SNAPSHOT_FILE);

        let client = CatalogClient::new(Arc::new(mock_with_all()));
        let doc = client.fetch_manifest(ROOT).unwrap();
        save_snapshot(&path, &doc).unwrap();

        let index = load_snapshot(&path).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        assert!(matches!(
            load_snapshot(Path::new("/nonexistent/GameFiles.json")),
            Err(CatalogError::Snapshot { .. })
        ));
    }
}

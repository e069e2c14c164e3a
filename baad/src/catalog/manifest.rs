//! Wire format for catalog documents.
//!
//! Upstream publishes one catalog document per category, all JSON once
//! decoded: the bundle list (`BundleFiles`), the table-bundle map
//! (`TableBundles`) and the media map (`MediaResources`). A merged
//! document containing all three sections is what `baad` caches on disk
//! as `GameFiles.json` and what [`CatalogIndex::parse`] consumes.
//!
//! [`CatalogIndex::parse`]: super::CatalogIndex::parse

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Merged manifest document. Each section is optional so the same type
/// deserializes both single-category upstream documents and the merged
/// snapshot.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ManifestDoc {
    /// Unity asset bundles.
    #[serde(rename = "BundleFiles", default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_files: Vec<BundleRecord>,

    /// Table bundles, keyed by file name. Map order is manifest order.
    #[serde(rename = "TableBundles", default, skip_serializing_if = "Map::is_empty")]
    pub table_bundles: Map<String, Value>,

    /// Media resources, keyed by logical id. Map order is manifest order.
    #[serde(rename = "MediaResources", default, skip_serializing_if = "Map::is_empty")]
    pub media_resources: Map<String, Value>,
}

impl ManifestDoc {
    /// Fold another document's sections into this one. Sections already
    /// populated here win; upstream never splits one section across
    /// documents.
    pub fn merge(mut self, other: ManifestDoc) -> ManifestDoc {
        if self.bundle_files.is_empty() {
            self.bundle_files = other.bundle_files;
        }
        if self.table_bundles.is_empty() {
            self.table_bundles = other.table_bundles;
        }
        if self.media_resources.is_empty() {
            self.media_resources = other.media_resources;
        }
        self
    }
}

/// One record of the bundle catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BundleRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// CRC-32 digest; upstream uses 0 for "not published".
    #[serde(rename = "Crc", default)]
    pub crc: u32,
    #[serde(rename = "Size", default)]
    pub size: u64,
}

/// Value of one `TableBundles` map entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableRecord {
    #[serde(default)]
    pub crc: u32,
    #[serde(default)]
    pub size: u64,
}

/// Value of one `MediaResources` map entry. Paths may use backslash
/// separators upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaRecord {
    pub path: String,
    #[serde(default)]
    pub crc: u32,
    #[serde(default)]
    pub bytes: u64,
}

/// Treat upstream's zero CRC as "no digest published".
pub(crate) fn crc_or_none(crc: u32) -> Option<u32> {
    (crc != 0).then_some(crc)
}

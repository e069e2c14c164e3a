//! Parsed, immutable view of a manifest.

use std::collections::HashMap;

use tracing::warn;

use super::entry::{CatalogEntry, Category};
use super::error::{CatalogError, CatalogResult};
use super::filter::CatalogFilter;
use super::manifest::{crc_or_none, ManifestDoc, MediaRecord, TableRecord};

/// Immutable index over a parsed manifest.
///
/// Owns the ordered entry sequence plus a lookup table keyed by
/// `(category, name)`. Built once per manifest fetch and never mutated;
/// a new manifest produces a new index.
#[derive(Debug)]
pub struct CatalogIndex {
    entries: Vec<CatalogEntry>,
    by_key: HashMap<(Category, String), usize>,
}

impl CatalogIndex {
    /// Parse a merged manifest document.
    ///
    /// Records with a duplicate `(category, name)` key are dropped in
    /// favor of the first occurrence, with a warning; real manifests
    /// have been observed to contain duplicates and one bad record must
    /// not abort the load.
    pub fn parse(raw: &[u8]) -> CatalogResult<CatalogIndex> {
        let doc: ManifestDoc =
            serde_json::from_slice(raw).map_err(|e| CatalogError::Malformed(e.to_string()))?;
        Self::from_doc(doc)
    }

    /// Build an index from an already-deserialized manifest document.
    pub fn from_doc(doc: ManifestDoc) -> CatalogResult<CatalogIndex> {
        let mut index = CatalogIndex {
            entries: Vec::new(),
            by_key: HashMap::new(),
        };

        for record in doc.bundle_files {
            let remote_path = format!("Android/{}", record.name);
            index.push(CatalogEntry {
                category: Category::BundleAsset,
                name: record.name,
                remote_path,
                size: record.size,
                crc: crc_or_none(record.crc),
            });
        }

        for (name, value) in doc.table_bundles {
            let record: TableRecord = serde_json::from_value(value).map_err(|e| {
                CatalogError::Malformed(format!("table bundle {name}: {e}"))
            })?;
            index.push(CatalogEntry {
                category: Category::TableBundle,
                remote_path: format!("TableBundles/{name}"),
                name,
                size: record.size,
                crc: crc_or_none(record.crc),
            });
        }

        for (key, value) in doc.media_resources {
            let record: MediaRecord = serde_json::from_value(value).map_err(|e| {
                CatalogError::Malformed(format!("media resource {key}: {e}"))
            })?;
            // Upstream media paths use backslash separators.
            let path = record.path.replace('\\', "/");
            index.push(CatalogEntry {
                category: Category::MediaResource,
                name: path.clone(),
                remote_path: format!("MediaResources/{path}"),
                size: record.bytes,
                crc: crc_or_none(record.crc),
            });
        }

        Ok(index)
    }

    fn push(&mut self, entry: CatalogEntry) {
        let key = (entry.category, entry.name.clone());
        if self.by_key.contains_key(&key) {
            warn!(
                category = %entry.category,
                name = %entry.name,
                "duplicate catalog entry, keeping first occurrence"
            );
            return;
        }
        self.by_key.insert(key, self.entries.len());
        self.entries.push(entry);
    }

    /// Look up an entry by `(category, name)`. O(1) expected.
    pub fn lookup(&self, category: Category, name: &str) -> Option<&CatalogEntry> {
        self.by_key
            .get(&(category, name.to_string()))
            .map(|&i| &self.entries[i])
    }

    /// All entries in manifest order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Lazy, restartable iteration over entries matching `filter`,
    /// preserving manifest order.
    pub fn iter_filtered<'a>(
        &'a self,
        filter: &'a CatalogFilter,
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries.iter().filter(|e| filter.matches(e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of expected sizes for entries matching `filter`.
    pub fn total_bytes(&self, filter: &CatalogFilter) -> u64 {
        self.iter_filtered(filter).map(|e| e.size).sum()
    }
}

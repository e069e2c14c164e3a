//! Catalog entry model.
//!
//! A catalog describes every remote object the game client can download:
//! Unity asset bundles, the table bundles holding game data, and media
//! resources (audio/video archives). Each record carries enough metadata
//! to plan an incremental download: a stable name, the path relative to
//! the catalog root, the expected byte size and, where upstream provides
//! one, a CRC-32 digest of the file contents.

use std::fmt;
use std::path::PathBuf;

/// Category of a downloadable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Unity asset bundles (`bundleDownloadInfo.json`).
    BundleAsset,
    /// Game-data table bundles (`TableCatalog`).
    TableBundle,
    /// Media archives: voice, music, video (`MediaCatalog`).
    MediaResource,
}

impl Category {
    /// All categories, in manifest order.
    pub const ALL: [Category; 3] = [
        Category::BundleAsset,
        Category::TableBundle,
        Category::MediaResource,
    ];

    /// Directory name used under the output root for downloaded files.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::BundleAsset => "AssetBundles",
            Category::TableBundle => "TableBundles",
            Category::MediaResource => "MediaResources",
        }
    }

    /// Directory name used for extracted output, placed as a sibling of
    /// the category directory.
    pub fn extracted_dir_name(&self) -> &'static str {
        match self {
            Category::BundleAsset => "AssetExtracted",
            Category::TableBundle => "TableExtracted",
            Category::MediaResource => "MediaExtracted",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A subset of categories used for filtered iteration and planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySet {
    bundles: bool,
    tables: bool,
    media: bool,
}

impl CategorySet {
    /// Set containing every category.
    pub fn all() -> Self {
        Self {
            bundles: true,
            tables: true,
            media: true,
        }
    }

    /// Empty set.
    pub fn none() -> Self {
        Self {
            bundles: false,
            tables: false,
            media: false,
        }
    }

    /// Returns a copy of the set with `category` included.
    pub fn with(mut self, category: Category) -> Self {
        match category {
            Category::BundleAsset => self.bundles = true,
            Category::TableBundle => self.tables = true,
            Category::MediaResource => self.media = true,
        }
        self
    }

    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::BundleAsset => self.bundles,
            Category::TableBundle => self.tables,
            Category::MediaResource => self.media,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.bundles || self.tables || self.media)
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

/// One manifest record.
///
/// Immutable once parsed; owned by the [`CatalogIndex`](super::CatalogIndex)
/// that produced it. `(category, name)` is unique across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub category: Category,
    /// Logical name, unique within the category. For media resources this
    /// is the full relative path so nested layouts stay collision-free.
    pub name: String,
    /// Locator relative to the catalog root URL.
    pub remote_path: String,
    /// Expected size in bytes.
    pub size: u64,
    /// Expected CRC-32 of the file contents. Absent for records where
    /// upstream publishes no digest.
    pub crc: Option<u32>,
}

impl CatalogEntry {
    /// Relative on-disk location under the output root:
    /// `<category dir>/<name>`.
    pub fn relative_dest(&self) -> PathBuf {
        PathBuf::from(self.category.dir_name()).join(&self.name)
    }
}

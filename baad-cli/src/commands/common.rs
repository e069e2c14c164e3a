//! Shared plumbing for CLI commands.

use std::sync::Arc;

use baad::catalog::{CatalogFilter, CatalogIndex, Category, CategorySet};
use baad::config::{cache_dir, Config};
use baad::extract::{CommandDecoder, ExtractionDispatcher};
use baad::net::{load_snapshot, save_snapshot, CatalogClient, ReqwestClient, SNAPSHOT_FILE};
use baad::resolver::{CatalogResolver, HttpServerInfoSource, HttpVersionProbe};
use tracing::{debug, warn};

use crate::error::CliError;

/// Category flags shared by `download` and `extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryFlags {
    pub assets: bool,
    pub tables: bool,
    pub media: bool,
    pub all: bool,
}

impl CategoryFlags {
    fn any_single(&self) -> bool {
        self.assets || self.tables || self.media
    }

    /// Resolve the flags into a category set.
    ///
    /// `--all` with any single-category flag is a usage error; no flags
    /// at all means everything.
    pub fn to_set(self) -> Result<CategorySet, CliError> {
        if self.all && self.any_single() {
            return Err(CliError::Usage(
                "'--all' cannot be used with other category options".to_string(),
            ));
        }
        if self.all || !self.any_single() {
            return Ok(CategorySet::all());
        }
        let mut set = CategorySet::none();
        if self.assets {
            set = set.with(Category::BundleAsset);
        }
        if self.tables {
            set = set.with(Category::TableBundle);
        }
        if self.media {
            set = set.with(Category::MediaResource);
        }
        Ok(set)
    }

    /// Extraction takes at most one category at a time.
    pub fn to_single(self) -> Result<Option<Category>, CliError> {
        if self.all && self.any_single() {
            return Err(CliError::Usage(
                "'--all' cannot be used with other category options".to_string(),
            ));
        }
        let picked = [self.assets, self.tables, self.media]
            .iter()
            .filter(|&&f| f)
            .count();
        if picked > 1 {
            return Err(CliError::Usage(
                "cannot use multiple extract options together (--assets, --tables, --media)"
                    .to_string(),
            ));
        }
        Ok(match (self.assets, self.tables, self.media) {
            (true, _, _) => Some(Category::BundleAsset),
            (_, true, _) => Some(Category::TableBundle),
            (_, _, true) => Some(Category::MediaResource),
            _ => None,
        })
    }
}

/// Build the filter for a category set plus optional name substring.
pub fn build_filter(categories: CategorySet, name: Option<&str>) -> CatalogFilter {
    let mut filter = CatalogFilter::all().with_categories(categories);
    if let Some(pattern) = name {
        filter = filter.with_name_substring(pattern);
    }
    filter
}

/// Construct the resolver from config endpoints, an optional
/// `--catalog` override and an optional `--version` pin.
pub fn build_resolver(
    config: &Config,
    catalog_override: Option<String>,
    version: Option<String>,
) -> CatalogResolver {
    let http = Arc::new(ReqwestClient::new());
    let mut resolver = CatalogResolver::new(
        Box::new(HttpVersionProbe::new(
            http.clone(),
            config.endpoints.notice_index.clone(),
        )),
        Box::new(HttpServerInfoSource::new(
            http,
            config.endpoints.server_info.clone(),
        )),
    )
    .with_patch_base(config.endpoints.patch_base.clone());
    if let Some(url) = catalog_override {
        resolver = resolver.with_override(url);
    }
    if let Some(version) = version {
        resolver = resolver.with_version(version);
    }
    resolver
}

/// Resolve the catalog root and fetch the merged index.
///
/// When the resolver went through the version probe, the merged
/// manifest is also snapshotted into the per-version cache directory
/// (snapshot failures only warn), and a previously saved snapshot
/// serves as a fallback when the upstream fetch fails.
pub fn fetch_index(
    resolver: &mut CatalogResolver,
    force: bool,
) -> Result<(String, CatalogIndex), CliError> {
    let root = resolver.resolve(force)?;
    let snapshot_path = resolver
        .cached()
        .and_then(|r| cache_dir(&r.version))
        .map(|dir| dir.join(SNAPSHOT_FILE));

    let client = CatalogClient::new(Arc::new(ReqwestClient::new()));
    let doc = match client.fetch_manifest(&root) {
        Ok(doc) => doc,
        Err(e) => {
            if let Some(path) = snapshot_path.as_deref().filter(|p| p.is_file()) {
                warn!(error = %e, path = %path.display(), "catalog fetch failed, using cached snapshot");
                return Ok((root, load_snapshot(path)?));
            }
            return Err(e.into());
        }
    };

    if let Some(path) = &snapshot_path {
        match save_snapshot(path, &doc) {
            Ok(()) => debug!(path = %path.display(), "saved catalog snapshot"),
            Err(e) => warn!(error = %e, "cannot save catalog snapshot"),
        }
    }

    let index = CatalogIndex::from_doc(doc).map_err(CliError::Catalog)?;
    Ok((root, index))
}

/// Build the extraction dispatcher from the configured decoder commands.
pub fn build_dispatcher(config: &Config) -> ExtractionDispatcher {
    ExtractionDispatcher::new(
        Box::new(CommandDecoder::new(
            config.decoders.primary.program.clone(),
            config.decoders.primary.args.clone(),
        )),
        Box::new(CommandDecoder::new(
            config.decoders.studio.program.clone(),
            config.decoders.studio.args.clone(),
        )),
    )
}

/// Human-readable size, matching the catalog listing display.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::new();
    }
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.1}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1}TB")
}

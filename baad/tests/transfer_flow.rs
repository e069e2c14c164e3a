//! End-to-end flow over the public API: parse a manifest, plan against
//! an output directory, run the engine, and confirm a second plan is
//! empty once everything landed on disk.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use tempfile::TempDir;

use baad::catalog::{CatalogFilter, CatalogIndex, Category};
use baad::engine::{
    channel, CancelToken, EngineConfig, FetchError, ObjectFetcher, TransferEngine,
};
use baad::local::{LocalStateStore, VerifyPolicy};
use baad::plan::TransferPlanner;

const BASE: &str = "https://cdn.example.com/r70";

/// Serves canned bodies keyed by full URL.
struct CannedFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl CannedFetcher {
    fn new() -> Self {
        Self {
            bodies: HashMap::new(),
        }
    }

    fn with_body(mut self, path: &str, body: &[u8]) -> Self {
        self.bodies.insert(format!("{BASE}/{path}"), body.to_vec());
        self
    }
}

impl ObjectFetcher for CannedFetcher {
    fn fetch(
        &self,
        url: &str,
        sink: &mut dyn Write,
        on_progress: &mut dyn FnMut(u64),
        _cancel: &CancelToken,
    ) -> Result<u64, FetchError> {
        let body = self.bodies.get(url).ok_or_else(|| FetchError::Permanent {
            url: url.to_string(),
            status: 404,
        })?;
        sink.write_all(body).map_err(|e| FetchError::Transient {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        on_progress(body.len() as u64);
        Ok(body.len() as u64)
    }
}

fn manifest() -> &'static [u8] {
    // CRCs match the literal bodies served by the fetcher below.
    br#"{
        "BundleFiles": [
            {"Name": "ui-common.bundle", "Crc": 222957957, "Size": 11}
        ],
        "TableBundles": {
            "skill_data": {"crc": 0, "size": 4}
        },
        "MediaResources": {
            "voice_jp_01": {"path": "Audio\\voice_jp_01.mp3", "crc": 0, "bytes": 6}
        }
    }"#
}

fn fetcher() -> CannedFetcher {
    CannedFetcher::new()
        .with_body("Android/ui-common.bundle", b"hello world")
        .with_body("TableBundles/skill_data", b"data")
        .with_body("MediaResources/Audio/voice_jp_01.mp3", b"sounds")
}

#[test]
fn test_full_flow_then_stable_no_op() {
    let out = TempDir::new().unwrap();
    let index = CatalogIndex::parse(manifest()).unwrap();
    let store = LocalStateStore::new(out.path(), VerifyPolicy::CrcWhenAvailable);
    let filter = CatalogFilter::all();

    let plan = TransferPlanner::new().plan(&index, &store, &filter);
    assert_eq!(plan.len(), 3);

    let engine = TransferEngine::new(Arc::new(fetcher()), EngineConfig::default());
    let (events, _rx) = channel();
    let report = engine.run(plan, BASE, events, &CancelToken::new());

    assert_eq!(report.completed, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.bytes_transferred, 21);
    assert!(!report.has_failures());

    assert_eq!(
        std::fs::read(out.path().join("AssetBundles/ui-common.bundle")).unwrap(),
        b"hello world"
    );
    assert_eq!(
        std::fs::read(out.path().join("MediaResources/Audio/voice_jp_01.mp3")).unwrap(),
        b"sounds"
    );

    // Nothing changed on disk, so the next plan must be empty.
    let replan = TransferPlanner::new().plan(&index, &store, &filter);
    assert!(replan.is_empty(), "second plan should be a no-op");
}

#[test]
fn test_corrupted_file_is_replanned_and_repaired() {
    let out = TempDir::new().unwrap();
    let index = CatalogIndex::parse(manifest()).unwrap();
    let store = LocalStateStore::new(out.path(), VerifyPolicy::CrcWhenAvailable);
    let filter = CatalogFilter::all();

    let engine = TransferEngine::new(Arc::new(fetcher()), EngineConfig::default());
    let (events, _rx) = channel();
    engine.run(
        TransferPlanner::new().plan(&index, &store, &filter),
        BASE,
        events,
        &CancelToken::new(),
    );

    // Same size, wrong contents; the CRC check must catch it.
    let bundle = out.path().join("AssetBundles/ui-common.bundle");
    std::fs::write(&bundle, b"hello_world").unwrap();

    let replan = TransferPlanner::new().plan(&index, &store, &filter);
    assert_eq!(replan.len(), 1);
    assert_eq!(replan.tasks()[0].entry.name, "ui-common.bundle");

    let (events, _rx) = channel();
    let report = engine.run(replan, BASE, events, &CancelToken::new());
    assert_eq!(report.completed, 1);
    assert_eq!(std::fs::read(&bundle).unwrap(), b"hello world");
}

#[test]
fn test_category_filter_limits_flow() {
    let out = TempDir::new().unwrap();
    let index = CatalogIndex::parse(manifest()).unwrap();
    let store = LocalStateStore::new(out.path(), VerifyPolicy::CrcWhenAvailable);
    let filter = CatalogFilter::all().with_categories(
        baad::catalog::CategorySet::none().with(Category::TableBundle),
    );

    let plan = TransferPlanner::new().plan(&index, &store, &filter);
    assert_eq!(plan.len(), 1);

    let engine = TransferEngine::new(Arc::new(fetcher()), EngineConfig::default());
    let (events, _rx) = channel();
    let report = engine.run(plan, BASE, events, &CancelToken::new());

    assert_eq!(report.completed, 1);
    assert!(out.path().join("TableBundles/skill_data").is_file());
    assert!(!out.path().join("AssetBundles/ui-common.bundle").exists());
}

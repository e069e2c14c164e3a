//! baad - incremental downloader for Blue Archive game assets.
//!
//! The library covers the whole pipeline: resolving the versioned
//! catalog root, fetching and merging the upstream catalogs into a
//! [`catalog::CatalogIndex`], diffing against the local output
//! directory, transferring the missing objects with a bounded worker
//! pool, and routing finished files to external decoder backends.
//!
//! Typical flow:
//!
//! ```ignore
//! let root = resolver.resolve(false)?;
//! let index = catalog_client.fetch_index(&root)?;
//! let store = LocalStateStore::new(&output_root, VerifyPolicy::default());
//! let plan = TransferPlanner::new().plan(&index, &store, &CatalogFilter::all());
//! let report = engine.run(plan, &root, events, cancel);
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod extract;
pub mod local;
pub mod logging;
pub mod net;
pub mod plan;
pub mod resolver;

pub use catalog::{CatalogEntry, CatalogFilter, CatalogIndex, Category, CategorySet};
pub use engine::{CancelToken, EngineConfig, TransferEngine, TransferEvent, TransferReport};
pub use local::{FileStatus, LocalStateStore, VerifyPolicy};
pub use plan::{TransferPlan, TransferPlanner};

/// Crate version, as published to the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Catalog model: manifest parsing, lookup and filtered iteration.
//!
//! A catalog (manifest) is the versioned remote listing of every
//! downloadable object. This module owns the parsed representation:
//!
//! ```text
//! raw manifest bytes ──► CatalogIndex ──► iter_filtered(CatalogFilter)
//!                            │
//!                            └── lookup(category, name)
//! ```
//!
//! The index is immutable after construction and safely shared across
//! download workers without locking.

mod entry;
mod error;
mod filter;
mod index;
mod manifest;

pub use entry::{CatalogEntry, Category, CategorySet};
pub use error::{CatalogError, CatalogResult};
pub use filter::CatalogFilter;
pub use index::CatalogIndex;
pub use manifest::{BundleRecord, ManifestDoc, MediaRecord, TableRecord};

//! Local filesystem state: what already exists under the output root.
//!
//! The store is recomputed from the filesystem on every run; there is no
//! persisted ledger. All reads are side-effect free and safe to run
//! concurrently; the store never deletes or renames anything.

mod checksum;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::catalog::CatalogEntry;

pub use checksum::file_crc32;

/// Completeness of a local file relative to its catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// No file at the expected destination.
    Missing,
    /// File present but size or digest disagrees with the catalog;
    /// must be re-fetched.
    SizeMismatch,
    /// File present with matching size (and digest, where checked).
    Verified,
}

/// How much verification a status check performs.
///
/// Hashing every file on every invocation is prohibitively slow for a
/// corpus of tens of thousands of objects, so the cheap size comparison
/// is the fast path and the CRC check is an additional, stricter gate
/// applied only where the catalog carries a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyPolicy {
    /// Size comparison only.
    SizeOnly,
    /// Size comparison, then CRC-32 for entries that publish a digest.
    #[default]
    CrcWhenAvailable,
}

/// Read-only view of the output directory.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    output_root: PathBuf,
    policy: VerifyPolicy,
}

impl LocalStateStore {
    pub fn new(output_root: impl Into<PathBuf>, policy: VerifyPolicy) -> Self {
        Self {
            output_root: output_root.into(),
            policy,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn policy(&self) -> VerifyPolicy {
        self.policy
    }

    /// Deterministic destination for an entry:
    /// `<output root>/<category dir>/<name>`.
    pub fn dest_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.output_root.join(entry.relative_dest())
    }

    /// Completeness of the local file for `entry`.
    ///
    /// A size match with a CRC mismatch reports [`FileStatus::SizeMismatch`]
    /// so the file is re-fetched; silent corruption is never accepted.
    /// Filesystem errors degrade conservatively: an unreadable metadata
    /// entry counts as missing, an unreadable body as a mismatch.
    pub fn status(&self, entry: &CatalogEntry) -> FileStatus {
        let path = self.dest_path(entry);

        let metadata = match std::fs::metadata(&path) {
            Ok(m) if m.is_file() => m,
            _ => return FileStatus::Missing,
        };

        if metadata.len() != entry.size {
            return FileStatus::SizeMismatch;
        }

        if self.policy == VerifyPolicy::CrcWhenAvailable {
            if let Some(expected) = entry.crc {
                match file_crc32(&path) {
                    Ok(actual) if actual == expected => {}
                    Ok(_) => return FileStatus::SizeMismatch,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to hash local file");
                        return FileStatus::SizeMismatch;
                    }
                }
            }
        }

        FileStatus::Verified
    }
}

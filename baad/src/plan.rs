//! Transfer planning: diff the catalog against local state.
//!
//! Planning is pure with respect to the catalog index, the filesystem
//! snapshot and the filter; it never touches the network. The resulting
//! plan is consumed exactly once by the transfer engine; recovery from
//! an interrupted run is simply a fresh planning pass.

use std::path::PathBuf;

use crate::catalog::{CatalogEntry, CatalogFilter, CatalogIndex};
use crate::local::{FileStatus, LocalStateStore};

/// One unit of transfer work: a catalog entry plus its destination.
#[derive(Debug, Clone)]
pub struct TransferTask {
    pub entry: CatalogEntry,
    pub dest: PathBuf,
}

/// Ordered sequence of transfer tasks.
///
/// Task order follows catalog iteration order, so plans are reproducible
/// across runs for the same manifest and filters. No two tasks reference
/// the same destination (catalog keys are unique and the destination
/// layout is deterministic).
#[derive(Debug, Default)]
pub struct TransferPlan {
    tasks: Vec<TransferTask>,
}

impl TransferPlan {
    /// Plan holding exactly one task, for single-item transfers.
    pub fn single(task: TransferTask) -> Self {
        Self { tasks: vec![task] }
    }

    pub fn tasks(&self) -> &[TransferTask] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<TransferTask> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Sum of expected sizes across all planned tasks.
    pub fn total_bytes(&self) -> u64 {
        self.tasks.iter().map(|t| t.entry.size).sum()
    }
}

/// Diffs a [`CatalogIndex`] against a [`LocalStateStore`].
#[derive(Debug, Default)]
pub struct TransferPlanner;

impl TransferPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Build a plan containing a task for every entry matching `filter`
    /// whose local status is not [`FileStatus::Verified`].
    pub fn plan(
        &self,
        index: &CatalogIndex,
        store: &LocalStateStore,
        filter: &CatalogFilter,
    ) -> TransferPlan {
        let tasks = index
            .iter_filtered(filter)
            .filter(|entry| store.status(entry) != FileStatus::Verified)
            .map(|entry| TransferTask {
                dest: store.dest_path(entry),
                entry: entry.clone(),
            })
            .collect();

        TransferPlan { tasks }
    }
}

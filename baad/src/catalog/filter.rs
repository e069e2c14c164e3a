//! Predicate for filtered catalog iteration.

use super::entry::{CatalogEntry, CategorySet};

/// Filter combining a category subset with an optional case-insensitive
/// substring match on the entry name.
///
/// The default filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    categories: CategorySet,
    /// Stored lowercased; matching lowercases the candidate name.
    name_substring: Option<String>,
}

impl CatalogFilter {
    /// Filter matching every entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict the filter to the given categories.
    pub fn with_categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    /// Restrict the filter to names containing `pattern`
    /// (case-insensitive). An empty pattern matches everything.
    pub fn with_name_substring(mut self, pattern: &str) -> Self {
        let pattern = pattern.trim().to_lowercase();
        self.name_substring = (!pattern.is_empty()).then_some(pattern);
        self
    }

    pub fn categories(&self) -> CategorySet {
        self.categories
    }

    /// Whether `entry` passes the filter.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if !self.categories.contains(entry.category) {
            return false;
        }
        match &self.name_substring {
            Some(pattern) => entry.name.to_lowercase().contains(pattern),
            None => true,
        }
    }
}

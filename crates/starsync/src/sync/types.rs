//! Shared sync types and constants.

use crate::model::{DatabaseRow, StarredItem};

/// Page size requested from the starred-repositories source.
pub const STARRED_PAGE_SIZE: u32 = 100;

/// Page size requested from the database query.
pub const ROWS_PAGE_SIZE: usize = 50;

/// Default number of concurrent create/archive requests.
///
/// Notion averages three requests per second per integration.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum concurrent create/archive requests. `1` applies items sequentially.
    pub concurrency: usize,
    /// Dry run mode - compute the plan but don't write anything.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }
}

/// What needs to change in the database to match the star list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Starred items with no row, in star order.
    pub to_create: Vec<StarredItem>,
    /// Rows whose item is no longer starred, in row order.
    pub to_delete: Vec<DatabaseRow>,
}

impl ReconciliationPlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// A single create or archive that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Display name of the item or row.
    pub name: String,
    /// Short error message.
    pub error: String,
}

impl ItemFailure {
    pub fn new(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
        }
    }
}

/// Outcome of a sync run, consumed by report formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of starred repositories ingested.
    pub total_starred: usize,
    /// Number of database rows ingested.
    pub total_rows: usize,
    /// Names of the items a row was created for.
    pub created: Vec<String>,
    /// Titles of the rows that were archived.
    pub deleted: Vec<String>,
    /// Creates that failed.
    pub create_failures: Vec<ItemFailure>,
    /// Archives that failed.
    pub delete_failures: Vec<ItemFailure>,
    /// Whether this run only planned changes.
    pub dry_run: bool,
}

impl RunSummary {
    /// Total number of per-item failures.
    pub fn failure_count(&self) -> usize {
        self.create_failures.len() + self.delete_failures.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_options_default() {
        let options = SyncOptions::default();

        assert_eq!(options.concurrency, DEFAULT_CONCURRENCY);
        assert!(!options.dry_run);
    }

    #[test]
    fn test_page_sizes() {
        assert_eq!(STARRED_PAGE_SIZE, 100);
        assert_eq!(ROWS_PAGE_SIZE, 50);
    }

    #[test]
    fn test_run_summary_default() {
        let summary = RunSummary::default();

        assert_eq!(summary.total_starred, 0);
        assert_eq!(summary.total_rows, 0);
        assert!(summary.created.is_empty());
        assert!(summary.deleted.is_empty());
        assert!(!summary.has_failures());
        assert!(!summary.dry_run);
    }

    #[test]
    fn test_run_summary_failure_count() {
        let summary = RunSummary {
            create_failures: vec![ItemFailure::new("a", "boom")],
            delete_failures: vec![ItemFailure::new("b", "bang"), ItemFailure::new("c", "pow")],
            ..RunSummary::default()
        };

        assert_eq!(summary.failure_count(), 3);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_plan_is_empty() {
        assert!(ReconciliationPlan::default().is_empty());
    }
}

//! Progress reporting types for sync runs.
//!
//! The engine emits these events through an optional callback so the CLI
//! can render or log them without the library deciding on an output format.

use std::fmt;

/// Which side of the sync a fetch event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// The user's starred repositories.
    Starred,
    /// Rows of the target database.
    Rows,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starred => f.write_str("starred"),
            Self::Rows => f.write_str("rows"),
        }
    }
}

/// Progress events emitted during a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Validating the database schema.
    ValidatingSchema,

    /// Starting to fetch one side of the sync.
    Fetching {
        /// Which side is being fetched.
        source: SourceKind,
    },

    /// Fetched one page.
    FetchedPage {
        /// Which side the page belongs to.
        source: SourceKind,
        /// Page number (1-indexed).
        page: u32,
        /// Number of records on this page.
        count: usize,
        /// Running total of records collected so far.
        total_so_far: usize,
    },

    /// Finished fetching one side.
    FetchComplete {
        /// Which side finished.
        source: SourceKind,
        /// Number of distinct records collected.
        total: usize,
    },

    /// Reconciliation plan computed.
    PlanReady {
        /// Rows that will be created.
        to_create: usize,
        /// Rows that will be archived.
        to_delete: usize,
    },

    /// Starting to create rows.
    CreatingRows {
        /// Number of rows to create.
        count: usize,
        /// Concurrency level for the apply phase.
        concurrency: usize,
    },

    /// Created a row for a starred item.
    RowCreated {
        /// Display name of the starred item.
        name: String,
    },

    /// Failed to create a row.
    CreateError {
        /// Display name of the starred item.
        name: String,
        /// Error message.
        error: String,
    },

    /// Starting to archive rows.
    ArchivingRows {
        /// Number of rows to archive.
        count: usize,
        /// Concurrency level for the apply phase.
        concurrency: usize,
    },

    /// Archived a stale row.
    RowArchived {
        /// Title of the row.
        title: String,
    },

    /// Failed to archive a row.
    ArchiveError {
        /// Title of the row.
        title: String,
        /// Error message.
        error: String,
    },

    /// Apply phase complete.
    ApplyComplete {
        /// Rows created.
        created: usize,
        /// Rows archived.
        archived: usize,
        /// Number of per-item failures.
        failed: usize,
    },

    /// Dry run: the plan was computed but nothing was written.
    DryRunSkippedApply {
        /// Rows that would have been created.
        to_create: usize,
        /// Rows that would have been archived.
        to_delete: usize,
    },

    /// Summary handed to the notification sink.
    NotificationSent,

    /// Non-fatal warning.
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Callback for progress updates during a sync run.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// # Example
///
/// ```ignore
/// use starsync::sync::{emit, SyncProgress, ProgressCallback};
///
/// fn report(on_progress: Option<&ProgressCallback>) {
///     emit(on_progress, SyncProgress::ValidatingSchema);
/// }
/// ```
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

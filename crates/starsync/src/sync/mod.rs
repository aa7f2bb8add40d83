//! Reconciliation of starred repositories into a database.
//!
//! # Module Structure
//!
//! - [`types`] - Core types: `SyncOptions`, `ReconciliationPlan`, `RunSummary`, constants
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`engine`] - The `Syncer`, schema validation, reconciliation and apply
//! - [`report`] - Plain-text rendering of a `RunSummary`
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starsync::sync::{SyncOptions, Syncer, format_summary};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn run(syncer: Syncer) -> Result<(), starsync::sync::SyncError> {
//!     let summary = syncer.sync_stars(&CancellationToken::new()).await?;
//!     println!("{}", format_summary(&summary));
//!     Ok(())
//! }
//! ```

pub mod engine;
mod errors;
mod progress;
mod report;
mod types;

// Re-export types
pub use types::{ItemFailure, ReconciliationPlan, RunSummary, SyncOptions};

// Re-export constants
pub use types::{DEFAULT_CONCURRENCY, ROWS_PAGE_SIZE, STARRED_PAGE_SIZE};

// Re-export progress types
pub use progress::{ProgressCallback, SourceKind, SyncProgress, emit};

pub use errors::{FetchError, SyncError};
pub use report::format_summary;

// Re-export engine items for convenience
pub use engine::{
    DatabaseLayout, DecodeError, PropertyMapping, SchemaError, Syncer, reconcile, validate_schema,
};

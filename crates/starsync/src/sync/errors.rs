use thiserror::Error;

use crate::source::SourceError;

use super::engine::{DecodeError, SchemaError};

/// Why ingesting one side of the sync stopped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("cancelled")]
    Cancelled,
}

/// Fatal errors that abort a sync run.
///
/// Per-item create and archive failures are not errors at this level; they
/// are collected into the run summary.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("error getting notion database: {0}")]
    GetDatabase(#[source] SourceError),

    #[error("error validating notion database: {0}")]
    ValidateDatabase(#[source] SchemaError),

    #[error("error getting notion pages: {0}")]
    GetPages(#[source] FetchError),

    #[error("error getting starred repos: {0}")]
    GetStarred(#[source] FetchError),

    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Lift an ingestion error, keeping cancellation distinct from failures.
    pub(super) fn from_rows(err: FetchError) -> Self {
        match err {
            FetchError::Cancelled => Self::Cancelled,
            other => Self::GetPages(other),
        }
    }

    pub(super) fn from_starred(err: FetchError) -> Self {
        match err {
            FetchError::Cancelled => Self::Cancelled,
            other => Self::GetStarred(other),
        }
    }
}

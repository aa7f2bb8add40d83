use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::model::{DatabaseRow, StarredItem};
use crate::source::{DatabaseWriter, SourceError, short_error_message};

use super::super::progress::{ProgressCallback, SyncProgress, emit};
use super::super::types::ItemFailure;
use super::schema::PropertyMapping;

/// Names that were written and the items that failed, in plan order.
#[derive(Debug, Default)]
pub(super) struct ApplyStats {
    pub(super) succeeded: Vec<String>,
    pub(super) failures: Vec<ItemFailure>,
}

enum TaskOutcome {
    Done,
    Failed(String),
    /// Cancelled before the request started.
    Skipped,
}

/// A task that panicked counts as a failure of the item it was writing.
async fn join_outcome(handle: JoinHandle<TaskOutcome>) -> TaskOutcome {
    handle
        .await
        .unwrap_or_else(|e| TaskOutcome::Failed(format!("Task panic: {e}")))
}

fn clamp_concurrency(concurrency: usize, items: usize) -> usize {
    std::cmp::max(1, std::cmp::min(concurrency, items))
}

/// Create a row for every item, at most `concurrency` requests at a time.
///
/// Failures are recorded and never stop the remaining creates.
pub(super) async fn create_rows(
    writer: &Arc<dyn DatabaseWriter>,
    mapping: &PropertyMapping,
    items: &[StarredItem],
    concurrency: usize,
    cancel: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> ApplyStats {
    let mut stats = ApplyStats::default();

    if items.is_empty() {
        return stats;
    }

    let concurrency = clamp_concurrency(concurrency, items.len());
    let semaphore = Arc::new(Semaphore::new(concurrency));

    emit(
        on_progress,
        SyncProgress::CreatingRows {
            count: items.len(),
            concurrency,
        },
    );

    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let writer = Arc::clone(writer);
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();
        let name = item.display_name().to_string();
        let new_row = mapping.new_row(item);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    let err = SourceError::internal("Semaphore closed unexpectedly");
                    return TaskOutcome::Failed(err.to_string());
                }
            };

            if cancel.is_cancelled() {
                return TaskOutcome::Skipped;
            }

            match writer.create_row(&new_row).await {
                Ok(row_id) => {
                    tracing::debug!(name = %task_name, row_id = %row_id, "Created row");
                    TaskOutcome::Done
                }
                Err(e) => TaskOutcome::Failed(short_error_message(&e)),
            }
        });

        handles.push((name, handle));
    }

    for (name, handle) in handles {
        match join_outcome(handle).await {
            TaskOutcome::Done => {
                emit(on_progress, SyncProgress::RowCreated { name: name.clone() });
                stats.succeeded.push(name);
            }
            TaskOutcome::Failed(error) => {
                tracing::warn!(name = %name, error = %error, "Failed to create row");
                emit(
                    on_progress,
                    SyncProgress::CreateError {
                        name: name.clone(),
                        error: error.clone(),
                    },
                );
                stats.failures.push(ItemFailure::new(name, error));
            }
            TaskOutcome::Skipped => {}
        }
    }

    stats
}

/// Archive every row, at most `concurrency` requests at a time.
///
/// Rows are only ever archived, never hard-deleted.
pub(super) async fn archive_rows(
    writer: &Arc<dyn DatabaseWriter>,
    rows: &[DatabaseRow],
    concurrency: usize,
    cancel: &CancellationToken,
    on_progress: Option<&ProgressCallback>,
) -> ApplyStats {
    let mut stats = ApplyStats::default();

    if rows.is_empty() {
        return stats;
    }

    let concurrency = clamp_concurrency(concurrency, rows.len());
    let semaphore = Arc::new(Semaphore::new(concurrency));

    emit(
        on_progress,
        SyncProgress::ArchivingRows {
            count: rows.len(),
            concurrency,
        },
    );

    let mut handles = Vec::with_capacity(rows.len());

    for row in rows {
        let writer = Arc::clone(writer);
        let semaphore = Arc::clone(&semaphore);
        let cancel = cancel.clone();
        let title = row.display_name().to_string();
        let row_id = row.row_id.clone();

        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    let err = SourceError::internal("Semaphore closed unexpectedly");
                    return TaskOutcome::Failed(err.to_string());
                }
            };

            if cancel.is_cancelled() {
                return TaskOutcome::Skipped;
            }

            match writer.archive_row(&row_id).await {
                Ok(()) => TaskOutcome::Done,
                Err(e) => TaskOutcome::Failed(short_error_message(&e)),
            }
        });

        handles.push((title, handle));
    }

    for (title, handle) in handles {
        match join_outcome(handle).await {
            TaskOutcome::Done => {
                emit(
                    on_progress,
                    SyncProgress::RowArchived {
                        title: title.clone(),
                    },
                );
                stats.succeeded.push(title);
            }
            TaskOutcome::Failed(error) => {
                tracing::warn!(title = %title, error = %error, "Failed to archive row");
                emit(
                    on_progress,
                    SyncProgress::ArchiveError {
                        title: title.clone(),
                        error: error.clone(),
                    },
                );
                stats.failures.push(ItemFailure::new(title, error));
            }
            TaskOutcome::Skipped => {}
        }
    }

    stats
}

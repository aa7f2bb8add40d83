//! Star-to-database sync engine.
//!
//! A run validates the database schema, ingests both sides concurrently,
//! computes a [`ReconciliationPlan`] and applies it with bounded
//! concurrency. The formatted report is handed to the notification sink.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use starsync::sync::{Syncer, SyncOptions};
//! use tokio_util::sync::CancellationToken;
//!
//! let syncer = Syncer::new(github, notion.clone(), notion)
//!     .with_options(SyncOptions { concurrency: 3, dry_run: false });
//! let summary = syncer.sync_stars(&CancellationToken::new()).await?;
//! println!("created {}", summary.created.len());
//! ```

mod apply;
mod fetch;
mod reconcile;
mod schema;

#[cfg(test)]
mod fakes;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::notify::{NoOpNotifier, NotificationSink};
use crate::source::{DatabaseRowSource, DatabaseWriter, StarredItemSource};

use super::errors::SyncError;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::report::format_summary;
use super::types::{ReconciliationPlan, RunSummary, SyncOptions};

pub use reconcile::reconcile;
pub use schema::{DatabaseLayout, DecodeError, PropertyMapping, SchemaError, validate_schema};

/// Runs the reconciliation between a starred source and a database.
pub struct Syncer {
    starred: Arc<dyn StarredItemSource>,
    rows: Arc<dyn DatabaseRowSource>,
    writer: Arc<dyn DatabaseWriter>,
    notifier: Arc<dyn NotificationSink>,
    layout: DatabaseLayout,
    options: SyncOptions,
    on_progress: Option<ProgressCallback>,
}

impl Syncer {
    pub fn new(
        starred: Arc<dyn StarredItemSource>,
        rows: Arc<dyn DatabaseRowSource>,
        writer: Arc<dyn DatabaseWriter>,
    ) -> Self {
        Self {
            starred,
            rows,
            writer,
            notifier: Arc::new(NoOpNotifier),
            layout: DatabaseLayout::default(),
            options: SyncOptions::default(),
            on_progress: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_layout(mut self, layout: DatabaseLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Run one full sync.
    ///
    /// Fails only on the fatal conditions in [`SyncError`]. Per-item write
    /// failures are collected into the returned summary.
    pub async fn sync_stars(&self, cancel: &CancellationToken) -> Result<RunSummary, SyncError> {
        let on_progress = self.on_progress.as_ref();

        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        emit(on_progress, SyncProgress::ValidatingSchema);
        let schema = self
            .rows
            .get_schema()
            .await
            .map_err(SyncError::GetDatabase)?;
        let mapping =
            validate_schema(&schema, &self.layout).map_err(SyncError::ValidateDatabase)?;

        if !mapping.unwritable().is_empty() {
            let missing = mapping.unwritable().join(", ");
            tracing::warn!(properties = %missing, "Database cannot receive optional properties");
            emit(
                on_progress,
                SyncProgress::Warning {
                    message: format!("Database has no writable property for: {missing}"),
                },
            );
        }

        let (rows, starred) = tokio::try_join!(
            async {
                fetch::fetch_rows(self.rows.as_ref(), &mapping, cancel, on_progress)
                    .await
                    .map_err(SyncError::from_rows)
            },
            async {
                fetch::fetch_starred(self.starred.as_ref(), cancel, on_progress)
                    .await
                    .map_err(SyncError::from_starred)
            },
        )?;

        tracing::info!(
            starred = starred.len(),
            rows = rows.len(),
            "Ingested starred repositories and database rows"
        );

        let plan = reconcile(&starred, &rows);
        emit(
            on_progress,
            SyncProgress::PlanReady {
                to_create: plan.to_create.len(),
                to_delete: plan.to_delete.len(),
            },
        );

        let mut summary = RunSummary {
            total_starred: starred.len(),
            total_rows: rows.len(),
            dry_run: self.options.dry_run,
            ..RunSummary::default()
        };

        if self.options.dry_run {
            emit(
                on_progress,
                SyncProgress::DryRunSkippedApply {
                    to_create: plan.to_create.len(),
                    to_delete: plan.to_delete.len(),
                },
            );
            summary.created = plan
                .to_create
                .iter()
                .map(|item| item.display_name().to_string())
                .collect();
            summary.deleted = plan
                .to_delete
                .iter()
                .map(|row| row.display_name().to_string())
                .collect();
            return Ok(summary);
        }

        self.apply(&mapping, &plan, cancel, &mut summary).await;

        if cancel.is_cancelled() {
            tracing::warn!(
                created = summary.created.len(),
                deleted = summary.deleted.len(),
                "Sync cancelled during apply"
            );
            return Err(SyncError::Cancelled);
        }

        self.notifier.send(&format_summary(&summary)).await;
        emit(on_progress, SyncProgress::NotificationSent);

        Ok(summary)
    }

    async fn apply(
        &self,
        mapping: &PropertyMapping,
        plan: &ReconciliationPlan,
        cancel: &CancellationToken,
        summary: &mut RunSummary,
    ) {
        let on_progress = self.on_progress.as_ref();
        let concurrency = self.options.concurrency;

        let created = apply::create_rows(
            &self.writer,
            mapping,
            &plan.to_create,
            concurrency,
            cancel,
            on_progress,
        )
        .await;
        summary.created = created.succeeded;
        summary.create_failures = created.failures;

        let archived = apply::archive_rows(
            &self.writer,
            &plan.to_delete,
            concurrency,
            cancel,
            on_progress,
        )
        .await;
        summary.deleted = archived.succeeded;
        summary.delete_failures = archived.failures;

        emit(
            on_progress,
            SyncProgress::ApplyComplete {
                created: summary.created.len(),
                archived: summary.deleted.len(),
                failed: summary.failure_count(),
            },
        );
    }
}

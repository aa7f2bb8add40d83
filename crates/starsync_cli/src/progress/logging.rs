use starsync::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::ValidatingSchema => {
                tracing::info!("Validating database schema");
            }

            SyncProgress::Fetching { source } => {
                tracing::info!(source = %source, "Fetching");
            }

            SyncProgress::FetchedPage {
                source,
                page,
                count,
                total_so_far,
            } => {
                tracing::debug!(source = %source, page, count, total_so_far, "Fetched page");
            }

            SyncProgress::FetchComplete { source, total } => {
                tracing::info!(source = %source, total, "Fetch complete");
            }

            SyncProgress::PlanReady {
                to_create,
                to_delete,
            } => {
                tracing::info!(to_create, to_delete, "Reconciliation plan ready");
            }

            SyncProgress::CreatingRows { count, concurrency } => {
                tracing::info!(count, concurrency, "Creating rows");
            }

            SyncProgress::RowCreated { name } => {
                tracing::info!(repo = %name, "Created row");
            }

            SyncProgress::CreateError { name, error } => {
                tracing::warn!(repo = %name, error = %error, "Failed to create row");
            }

            SyncProgress::ArchivingRows { count, concurrency } => {
                tracing::info!(count, concurrency, "Archiving rows");
            }

            SyncProgress::RowArchived { title } => {
                tracing::info!(row = %title, "Archived row");
            }

            SyncProgress::ArchiveError { title, error } => {
                tracing::warn!(row = %title, error = %error, "Failed to archive row");
            }

            SyncProgress::ApplyComplete {
                created,
                archived,
                failed,
            } => {
                tracing::info!(created, archived, failed, "Apply complete");
            }

            SyncProgress::DryRunSkippedApply {
                to_create,
                to_delete,
            } => {
                tracing::info!(to_create, to_delete, "Dry run - no changes written");
            }

            SyncProgress::NotificationSent => {
                tracing::debug!("Report handed to notification sink");
            }

            SyncProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}

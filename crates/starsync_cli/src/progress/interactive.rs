use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use starsync::sync::{SourceKind, SyncProgress};

const TICK: Duration = Duration::from_millis(100);

/// Consolidated progress state to avoid multiple mutex locks.
#[derive(Default)]
struct ProgressState {
    /// Schema check spinner.
    schema_bar: Option<ProgressBar>,
    /// Spinner for the starred-repository fetch.
    starred_bar: Option<ProgressBar>,
    /// Spinner for the database row fetch.
    rows_bar: Option<ProgressBar>,
    /// Bar for row creation.
    create_bar: Option<ProgressBar>,
    /// Bar for row archiving.
    archive_bar: Option<ProgressBar>,
}

impl ProgressState {
    fn fetch_bar(&self, source: SourceKind) -> Option<&ProgressBar> {
        match source {
            SourceKind::Starred => self.starred_bar.as_ref(),
            SourceKind::Rows => self.rows_bar.as_ref(),
        }
    }

    fn bars(&self) -> impl Iterator<Item = &ProgressBar> {
        [
            &self.schema_bar,
            &self.starred_bar,
            &self.rows_bar,
            &self.create_bar,
            &self.archive_bar,
        ]
        .into_iter()
        .flatten()
    }
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    fn spinner(&self, prefix: &str, message: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.enable_steady_tick(TICK);
        pb.set_prefix(format!("{prefix:12}"));
        pb.set_message(message.to_string());
        pb
    }

    fn bar(&self, prefix: &str, len: usize) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new(len as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix(format!("{prefix:12}"));
        pb
    }

    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            SyncProgress::ValidatingSchema => {
                state.schema_bar = Some(self.spinner("Schema", "Validating database..."));
            }

            SyncProgress::Fetching { source } => {
                if let Some(ref pb) = state.schema_bar
                    && !pb.is_finished()
                {
                    pb.finish_with_message("✓ database schema ok");
                }

                let pb = match source {
                    SourceKind::Starred => self.spinner("Stars", "Fetching starred repositories..."),
                    SourceKind::Rows => self.spinner("Notion", "Fetching database rows..."),
                };
                match source {
                    SourceKind::Starred => state.starred_bar = Some(pb),
                    SourceKind::Rows => state.rows_bar = Some(pb),
                }
            }

            SyncProgress::FetchedPage {
                source,
                page,
                total_so_far,
                ..
            } => {
                if let Some(pb) = state.fetch_bar(source) {
                    pb.set_message(format!("Page {page} ({total_so_far} so far)"));
                }
            }

            SyncProgress::FetchComplete { source, total } => {
                if let Some(pb) = state.fetch_bar(source) {
                    let noun = match source {
                        SourceKind::Starred => "starred repos",
                        SourceKind::Rows => "rows",
                    };
                    pb.finish_with_message(format!("✓ {total} {noun}"));
                }
            }

            SyncProgress::PlanReady {
                to_create,
                to_delete,
            } => {
                drop(state);
                self.multi
                    .println(format!("Plan: {to_create} to create, {to_delete} to archive"))
                    .ok();
            }

            SyncProgress::CreatingRows { count, .. } => {
                let pb = self.bar("Creating", count);
                state.create_bar = Some(pb);
            }

            SyncProgress::RowCreated { name } => {
                if let Some(ref pb) = state.create_bar {
                    pb.inc(1);
                    pb.set_message(name);
                }
            }

            SyncProgress::CreateError { name, error } => {
                if let Some(ref pb) = state.create_bar {
                    pb.inc(1);
                }
                drop(state);
                self.multi.println(format!("✗ {name}: {error}")).ok();
            }

            SyncProgress::ArchivingRows { count, .. } => {
                let pb = self.bar("Archiving", count);
                state.archive_bar = Some(pb);
            }

            SyncProgress::RowArchived { title } => {
                if let Some(ref pb) = state.archive_bar {
                    pb.inc(1);
                    pb.set_message(title);
                }
            }

            SyncProgress::ArchiveError { title, error } => {
                if let Some(ref pb) = state.archive_bar {
                    pb.inc(1);
                }
                drop(state);
                self.multi.println(format!("✗ {title}: {error}")).ok();
            }

            SyncProgress::ApplyComplete {
                created, archived, ..
            } => {
                if let Some(ref pb) = state.create_bar {
                    pb.finish_with_message(format!("✓ {created} created"));
                }
                if let Some(ref pb) = state.archive_bar {
                    pb.finish_with_message(format!("✓ {archived} archived"));
                }
            }

            SyncProgress::DryRunSkippedApply { .. } => {
                drop(state);
                self.multi.println("Dry run - nothing written").ok();
            }

            SyncProgress::Warning { message } => {
                drop(state);
                self.multi.println(format!("⚠ {message}")).ok();
            }

            _ => {}
        }
    }

    pub fn finish(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for pb in state.bars() {
            if !pb.is_finished() {
                pb.finish();
            }
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

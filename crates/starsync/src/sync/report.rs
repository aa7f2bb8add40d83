//! Rendering of a [`RunSummary`] into a notification body.

use std::fmt::Write;

use super::types::{ItemFailure, RunSummary};

const HEADER: &str = "Github Stars Synced";
const DRY_RUN_HEADER: &str = "Github Stars Sync (dry run)";

/// Render a run summary as a plain-text report.
///
/// The counts are always present. The `Created`, `Deleted`, `Create Failed`
/// and `Delete Failed` blocks appear only when they have entries.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut buf = String::new();

    buf.push_str(if summary.dry_run { DRY_RUN_HEADER } else { HEADER });
    buf.push_str("\n\n");
    let _ = writeln!(buf, "Github Stars Num: {}", summary.total_starred);
    let _ = writeln!(buf, "Notion Pages Num: {}", summary.total_rows);
    let _ = writeln!(buf, "Create Num: {}", summary.created.len());
    let _ = writeln!(buf, "Delete Num: {}", summary.deleted.len());

    write_names(&mut buf, "Created", &summary.created);
    write_names(&mut buf, "Deleted", &summary.deleted);
    write_failures(&mut buf, "Create Failed", &summary.create_failures);
    write_failures(&mut buf, "Delete Failed", &summary.delete_failures);

    buf
}

fn write_names(buf: &mut String, heading: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }

    buf.push('\n');
    let _ = writeln!(buf, "{heading}:");
    for name in names {
        buf.push_str(name);
        buf.push('\n');
    }
}

fn write_failures(buf: &mut String, heading: &str, failures: &[ItemFailure]) {
    if failures.is_empty() {
        return;
    }

    buf.push('\n');
    let _ = writeln!(buf, "{heading}:");
    for failure in failures {
        let _ = writeln!(buf, "{}: {}", failure.name, failure.error);
    }
}

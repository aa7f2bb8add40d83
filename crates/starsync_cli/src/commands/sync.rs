//! The `sync` command: mirror starred repositories into the Notion database.

use std::error::Error;
use std::sync::Arc;

use console::{Term, style};
use starsync::github::GitHubClient;
use starsync::http::HttpTransport;
use starsync::http::reqwest_transport::{DEFAULT_TIMEOUT, ReqwestTransport};
use starsync::notify::{NoOpNotifier, NotificationSink, WeChatNotifier};
use starsync::notion::NotionClient;
use starsync::sync::{RunSummary, Syncer, format_summary};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, SyncSettings};
use crate::progress::ProgressReporter;

/// Flags for `starsync sync`. Each one overrides the matching config value.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SyncArgs {
    /// GitHub token with access to the user's stars
    #[arg(long)]
    pub github_token: Option<String>,

    /// Notion integration token
    #[arg(long)]
    pub notion_token: Option<String>,

    /// ID of the Notion database to mirror into
    #[arg(long)]
    pub notion_database_id: Option<String>,

    /// WeChat Work report target: corpid,corpsecret,touser,agentid
    #[arg(long)]
    pub notification_wechat_params: Option<String>,

    /// Maximum concurrent create/archive requests (default from config or 3)
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Dry run - compute the plan and report it without writing to Notion.
    /// `--dry-run=false` turns off a dry run enabled in the config file
    #[arg(
        short = 'n',
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub dry_run: Option<bool>,
}

/// Handle `starsync sync`.
pub async fn handle_sync(
    args: SyncArgs,
    config: Config,
    cancel: CancellationToken,
) -> Result<(), Box<dyn Error>> {
    let settings = config.resolve(&args)?;
    let syncer = build_syncer(&settings)?;

    let reporter = Arc::new(ProgressReporter::new());
    let syncer = syncer.with_progress(reporter.as_callback());

    let result = syncer.sync_stars(&cancel).await;
    reporter.finish();

    let summary = result?;
    print_summary(&summary);
    Ok(())
}

fn build_syncer(settings: &SyncSettings) -> Result<Syncer, Box<dyn Error>> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?);

    let github = Arc::new(GitHubClient::new(
        settings.github_token.clone(),
        Arc::clone(&transport),
    ));
    let notion = Arc::new(NotionClient::new(
        settings.notion_token.clone(),
        settings.database_id.clone(),
        Arc::clone(&transport),
    ));

    let notifier: Arc<dyn NotificationSink> = match &settings.wechat_params {
        Some(params) => Arc::new(WeChatNotifier::from_params(params, transport)?),
        None => Arc::new(NoOpNotifier),
    };

    tracing::debug!(
        database_id = %settings.database_id,
        concurrency = settings.options.concurrency,
        dry_run = settings.options.dry_run,
        "Starting sync"
    );

    Ok(Syncer::new(github, notion.clone(), notion)
        .with_notifier(notifier)
        .with_layout(settings.layout.clone())
        .with_options(settings.options.clone()))
}

fn print_summary(summary: &RunSummary) {
    let report = format_summary(summary);

    if Term::stdout().is_term() {
        println!();
        print!("{report}");
        if summary.has_failures() {
            println!(
                "\n{} {} item(s) failed",
                style("⚠").yellow().bold(),
                summary.failure_count()
            );
        } else {
            println!("\n{} Sync complete", style("✓").green().bold());
        }
    } else {
        tracing::info!(
            total_starred = summary.total_starred,
            total_rows = summary.total_rows,
            created = summary.created.len(),
            deleted = summary.deleted.len(),
            failed = summary.failure_count(),
            dry_run = summary.dry_run,
            "Sync finished"
        );
        for line in report.lines().filter(|l| !l.is_empty()) {
            tracing::info!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SyncArgs,
    }

    fn parse(argv: &[&str]) -> SyncArgs {
        TestCli::try_parse_from(std::iter::once("starsync").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_dry_run_flag_forms() {
        assert_eq!(parse(&[]).dry_run, None);
        assert_eq!(parse(&["--dry-run"]).dry_run, Some(true));
        assert_eq!(parse(&["-n"]).dry_run, Some(true));
        assert_eq!(parse(&["--dry-run=false"]).dry_run, Some(false));
        assert_eq!(parse(&["--dry-run=true"]).dry_run, Some(true));
    }

    #[test]
    fn test_flags_parse() {
        let args = parse(&["-c", "5", "--notion-database-id", "db-1"]);
        assert_eq!(args.concurrency, Some(5));
        assert_eq!(args.notion_database_id.as_deref(), Some("db-1"));
        assert!(args.github_token.is_none());
    }
}

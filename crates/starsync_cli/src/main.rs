//! starsync CLI - mirror GitHub stars into a Notion database.

mod commands;
mod config;
mod progress;
mod shutdown;

use clap::{Parser, Subcommand};
use console::Term;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::commands::sync::SyncArgs;

#[derive(Parser)]
#[command(name = "starsync")]
#[command(version)]
#[command(about = "Mirror your GitHub stars into a Notion database")]
#[command(
    long_about = "starsync reads every repository you have starred on GitHub and every row \
of a Notion database, creates a row for each new star and archives rows whose \
repository is no longer starred. A summary can be sent to WeChat Work."
)]
#[command(after_long_help = r#"EXAMPLES
    Sync once with tokens from the environment:
        $ STARSYNC_GITHUB__TOKEN=ghp_... STARSYNC_NOTION__TOKEN=secret_... \
          starsync sync --notion-database-id 0123456789abcdef0123456789abcdef

    See what would change without writing:
        $ starsync sync --dry-run

CONFIGURATION
    starsync reads configuration from (later wins):
      1. ~/.config/starsync/config.toml (or $XDG_CONFIG_HOME/starsync/config.toml)
      2. ./starsync.toml
      3. Environment variables (STARSYNC_ prefix, sections joined by "__")
      4. Command-line flags
    A .env file in the current directory is loaded first.

ENVIRONMENT VARIABLES
    STARSYNC_GITHUB__TOKEN                 GitHub token
    STARSYNC_NOTION__TOKEN                 Notion integration token
    STARSYNC_NOTION__DATABASE_ID           Target database ID
    STARSYNC_NOTIFICATION__WECHAT_PARAMS   corpid,corpsecret,touser,agentid
    STARSYNC_SYNC__CONCURRENCY             Concurrent Notion writes (default: 3)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the Notion database with your starred repositories
    Sync(SyncArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cancel = CancellationToken::new();
    shutdown::setup_shutdown_handler(cancel.clone());

    // Structured logging for non-TTY runs; a TTY gets progress bars instead.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("starsync=info,starsync_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config files -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync(args) => {
            commands::sync::handle_sync(args, config, cancel).await?;
        }
    }

    Ok(())
}

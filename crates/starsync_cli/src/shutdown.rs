use console::Term;
use tokio_util::sync::CancellationToken;

/// Exit code used when the user force-quits with a second Ctrl+C.
const FORCE_QUIT_EXIT_CODE: i32 = 130;

/// Set up the Ctrl+C handler for graceful shutdown.
///
/// The first Ctrl+C cancels `cancel`, which stops pagination and skips apply
/// items that have not started. A second Ctrl+C exits immediately.
pub(crate) fn setup_shutdown_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }

        let is_tty = Term::stdout().is_term();
        if is_tty {
            eprintln!("\n\nShutdown requested, finishing in-flight requests...");
            eprintln!("Press Ctrl+C again to force quit.");
        } else {
            tracing::warn!("Shutdown requested, finishing in-flight requests");
        }

        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            if is_tty {
                eprintln!("Force quit!");
            }
            std::process::exit(FORCE_QUIT_EXIT_CODE);
        }
    });
}

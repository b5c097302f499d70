//! Roster service entry point.

use clap::Parser;
use gitlab_roster::config::Args;
use gitlab_roster::error::AppError;
use gitlab_roster::services::{roster_server, GitLabClient, Roster};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    init_logging(&args);

    if let Err(e) = run(args).await {
        log::error!("[main] {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the fmt subscriber; its `log` bridge picks up library logs.
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run(args: Args) -> Result<(), AppError> {
    log::info!(
        "[main] gitlab-roster v{} using {}",
        env!("CARGO_PKG_VERSION"),
        args.base_url()
    );

    let client = GitLabClient::new(args.client_config())?;
    let roster = Arc::new(Roster::new(client));

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("[main] Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => log::warn!("[main] Cannot listen for Ctrl-C: {}", e),
        }
    });

    let listener = roster_server::bind(args.port).await?;
    roster_server::serve(listener, roster_server::router(roster), cancel).await
}

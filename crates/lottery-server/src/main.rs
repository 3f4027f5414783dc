//! Lottery server binary
//!
//! Loads the config, resumes or cold-starts the lottery, and serves the
//! JSON API until interrupted.

use anyhow::Result;
use clap::Parser;
use lottery_server::{open_lottery, router, AppState, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lottery-server")]
#[command(about = "Prize draw server with blacklists and resumable state", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, default_value = "settings/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::load(&cli.config)?;
    info!(lottery = %config.lottery_name, addr = %config.addr, "Loaded config");

    let (lottery, mode) = open_lottery(&config)?;
    info!(?mode, data_file = %lottery.data_file_path().display(), "Lottery ready");

    let app = router(AppState::new(lottery, config.autosave));
    let addr: SocketAddr = config.addr.parse()?;

    info!(%addr, "Starting lottery server");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

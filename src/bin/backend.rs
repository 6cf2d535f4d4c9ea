#![forbid(unsafe_code)]

//! HTTP backend exposing the `/fetch` and `/download` endpoints.
//!
//! The binary only wires things together: configuration, the yt-dlp probe,
//! and the axum router from the library.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tubegrab::api::{self, AppState};
use tubegrab::config::ServerConfig;
use tubegrab::security;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Serve YouTube metadata lookups and media downloads over HTTP."
)]
struct Cli {
    #[arg(
        long = "host",
        value_name = "ADDR",
        help = "Override the listen address"
    )]
    host: Option<String>,
    #[arg(long = "port", value_name = "PORT", help = "Override the listen port")]
    port: Option<u16>,
    #[arg(
        long = "download-dir",
        value_name = "PATH",
        help = "Directory receiving downloaded media"
    )]
    download_dir: Option<PathBuf>,
    #[arg(
        long = "ytdlp",
        value_name = "PATH",
        help = "yt-dlp executable to invoke"
    )]
    ytdlp: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    security::ensure_not_root("backend")?;

    let mut config = ServerConfig::from_env().context("reading configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(download_dir) = cli.download_dir {
        config.download_dir = download_dir;
    }
    if let Some(ytdlp) = cli.ytdlp {
        config.ytdlp_program = ytdlp;
    }

    let state = AppState::new(&config);
    state.extractor.ensure_available().await?;

    let app = api::router(state);

    let addr = SocketAddr::new(
        config.host.parse().context("parsing listen host")?,
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
}

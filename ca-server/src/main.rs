//! ca-server - visitor lookup backend
//!
//! Serves person search, photos, exit registration and card checks over a
//! SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ca_common::config::load_config;
use ca_server::{build_router, db, AppState};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for ca-server
#[derive(Parser, Debug)]
#[command(name = "ca-server")]
#[command(about = "Visitor lookup backend for the access-control system")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CA_SERVER_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "CA_SERVER_HOST")]
    host: String,

    /// SQLite database file
    #[arg(short, long, env = "CA_DATABASE")]
    database: Option<PathBuf>,

    /// Config file (default: platform config directory)
    #[arg(short, long, env = "CA_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=info", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ca-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let db_path = args.database.unwrap_or(config.server.database_path);
    let port = args.port.unwrap_or(config.server.port);

    let pool = db::connect(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let app = build_router(AppState::new(pool));

    let addr: SocketAddr = format!("{}:{}", args.host, port)
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("ca-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("ca-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

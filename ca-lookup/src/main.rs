//! dni-lookup: operator client for the visit registration form
//!
//! Types each DNI into the form's DNI field and blurs it (DNIs given as
//! arguments), or reads one DNI per stdin line and presses Enter. After each
//! lookup the form is printed to stdout; logs go to stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use ca_common::config::load_config;
use ca_lookup::render::render_form;
use ca_lookup::{FormEvent, FormView, HttpLookupClient, Key, LookupController};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Command-line arguments for dni-lookup
#[derive(Parser, Debug)]
#[command(name = "dni-lookup")]
#[command(about = "Look up visitors by DNI and pre-fill the registration form")]
#[command(version)]
struct Args {
    /// Backend base URL
    #[arg(short, long, env = "CA_SERVER_URL")]
    server_url: Option<String>,

    /// Only report active visits in this sede
    #[arg(long, env = "CA_SEDE_ID")]
    sede: Option<i64>,

    /// Request timeout in seconds
    #[arg(long, env = "CA_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Config file (default: platform config directory)
    #[arg(short, long, env = "CA_CONFIG")]
    config: Option<PathBuf>,

    /// DNIs to look up; reads stdin when empty
    dnis: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting dni-lookup v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let server_url = args.server_url.unwrap_or(config.client.server_url);
    let sede_id = args.sede.or(config.client.sede_id);
    let timeout = Duration::from_secs(
        args.timeout_secs
            .unwrap_or(config.client.request_timeout_secs),
    );

    info!("Backend: {}", server_url);
    if let Some(sede_id) = sede_id {
        info!("Active visits restricted to sede {}", sede_id);
    }

    let client = HttpLookupClient::new(&server_url, timeout, sede_id)
        .context("Failed to create HTTP client")?;
    let mut controller = LookupController::new(client);
    let mut form = FormView::with_all_elements();

    if !args.dnis.is_empty() {
        for dni in &args.dnis {
            form.dni.set_value(dni.as_str());
            controller.handle_event(&mut form, FormEvent::Blur).await;
            println!("{}", render_form(&form));
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        form.dni.set_value(line);
        let response = controller
            .handle_event(&mut form, FormEvent::KeyPress(Key::Enter))
            .await;
        if response.rendered.is_some() {
            println!("{}", render_form(&form));
        }
    }

    Ok(())
}

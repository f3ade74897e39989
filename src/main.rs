//! Vigil - Session-Inactivity Watchdog
//!
//! CLI entry point for the Vigil watchdog daemon.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_core::{FileTokenStore, HttpSessionProbe, InactivityMonitor};

mod config;
mod surface;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "vigil", version, about = "Session-inactivity watchdog for the Vigil dashboard")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "vigil.toml")]
    config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let app_config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    info!("Starting Vigil v{}", env!("CARGO_PKG_VERSION"));

    let probe = HttpSessionProbe::new(
        app_config.endpoints.admin_status_url.clone(),
        app_config.endpoints.user_status_url.clone(),
    )
    .with_timeout(app_config.monitor.probe_timeout());

    let monitor = InactivityMonitor::builder()
        .config(app_config.monitor.clone())
        .store(Arc::new(FileTokenStore::new(&app_config.tokens.path)))
        .probe(Arc::new(probe))
        .surface(Arc::new(surface::TerminalNoticeSurface::new()))
        .build()?;
    let handle = monitor.start();

    wait_for_shutdown_signal().await;
    handle.stop();
    info!("Vigil shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

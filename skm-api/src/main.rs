//! skm-api - Skills Music API
//!
//! Serves the sound catalog scanned from the assets folder, the raw audio
//! and cover files, and per-key alarm CRUD backed by SQLite.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skm_common::config::{ConfigOverrides, ServiceConfig};
use skm_common::db::{init_database, reset_alarms_table};
use skm_api::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for skm-api
///
/// Anything not given here (or through the matching environment
/// variable) comes from the config file, then from compiled defaults.
#[derive(Parser, Debug)]
#[command(name = "skm-api")]
#[command(about = "Skills Music API: sound catalog and alarm scheduling")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SKM_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "SKM_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Folder holding music/, description/ and cover/
    #[arg(short, long, env = "SKM_ASSETS_ROOT")]
    assets_root: Option<PathBuf>,

    /// SQLite database file for alarms
    #[arg(short, long, env = "SKM_DATABASE")]
    database: Option<PathBuf>,

    /// Accepted API keys (comma separated), replacing the configured list
    #[arg(long, env = "SKM_API_KEYS", value_delimiter = ',')]
    api_keys: Option<Vec<String>>,

    /// Scope alarms to the key that created them
    #[arg(long, env = "SKM_ALARM_SCOPING")]
    alarm_scoping: Option<bool>,

    /// Drop all stored alarms at startup
    #[arg(long, env = "SKM_RESET_DATABASE")]
    reset_database: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            assets_root: self.assets_root.clone(),
            database_path: self.database.clone(),
            api_keys: self.api_keys.clone(),
            alarm_scoping: self.alarm_scoping,
            reset_database_on_start: self.reset_database.then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skm_api=info,skm_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skills Music API (skm-api) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config =
        ServiceConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(args.overrides());

    info!("Assets root: {}", config.assets_root.display());
    info!("Database path: {}", config.database_path.display());
    info!(
        "Alarm scoping {}, catalog {}",
        if config.alarm_scoping { "enabled" } else { "disabled" },
        if config.catalog_requires_key { "protected" } else { "public" }
    );
    if config.api_keys().is_empty() {
        warn!("No API keys configured: protected routes will reject every request");
    }

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    if config.reset_database_on_start {
        reset_alarms_table(&pool)
            .await
            .context("Failed to reset alarms table")?;
    }

    let state = AppState::from_config(pool, &config)?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("skm-api listening on http://{}", addr);
    info!("Documentation UI: http://{}/ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        },
    }
}

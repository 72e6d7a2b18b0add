//! alumni-map - Alumni roster and map service
//!
//! Serves the student roster API consumed by the alumni map frontend:
//! CRUD on student records plus bulk import from CSV uploads and public
//! Google Sheets, with locations geocoded through Nominatim.

use std::path::PathBuf;

use alumni_common::config::ServiceConfig;
use alumni_map::{build_app, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for alumni-map
#[derive(Parser, Debug)]
#[command(name = "alumni-map")]
#[command(about = "Alumni roster service with geocoded locations")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "ALUMNI_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (e.g. 0.0.0.0:8000)
    #[arg(short, long, env = "ALUMNI_BIND")]
    bind: Option<String>,

    /// Student record CSV file
    #[arg(short, long, env = "ALUMNI_DATA_FILE")]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServiceConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting alumni-map v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(origins = ?config.allowed_origins, "CORS allowed origins");

    let state = AppState::from_config(&config).context("Failed to initialize services")?;
    info!(
        backend = state.store.backend_name(),
        data_file = %config.data_file.display(),
        "Record store configured"
    );

    // Materialize the record file up front so a bad path fails at startup
    let existing = state
        .store
        .load_all()
        .await
        .context("Failed to open record store")?;
    info!("Loaded {} student records", existing.len());

    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("alumni-map listening on http://{}", config.bind);

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
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

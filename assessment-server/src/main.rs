//! assessment-server - Capability self-assessment service
//!
//! Receives Typeform webhooks, scores and stores submissions, emails the
//! reviewer a summary, and serves results to the results page.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use assessment_common::config::{load_toml_config, AppConfig};
use assessment_common::db::{init_database, ResultStore};
use clap::Parser;
use tokio::signal;
use tracing::info;

use assessment_server::cli::Cli;
use assessment_server::notify::worker::DEFAULT_QUEUE_CAPACITY;
use assessment_server::notify::{NotificationQueue, Notifier, SendGridTransport};
use assessment_server::{build_router, AppState};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,assessment_server=debug".into()),
        )
        .init();

    // Build identification first, before any I/O can delay startup feedback
    info!(
        "Starting assessment-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let file = load_toml_config(cli.config.as_deref()).context("Failed to load config file")?;
    let config = AppConfig::resolve(cli.into_overrides(), file).context("Invalid configuration")?;
    config.log_missing();

    info!("Database path: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("✓ Database ready");

    let transport = SendGridTransport::new(&config.email).context("Failed to set up mail transport")?;
    let notifier = Notifier::new(
        Arc::new(transport),
        config.questionnaire.clone(),
        config.public_base_url.clone(),
    );
    let (notifications, worker) = NotificationQueue::spawn(notifier.clone(), DEFAULT_QUEUE_CAPACITY);

    let bind_address = config.bind_address.clone();
    let state = AppState::new(ResultStore::new(pool), notifier, notifications, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("assessment-server listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Router (and its queue handles) is gone; let queued notifications drain
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Notification worker ended abnormally: {}", e),
        Err(_) => tracing::warn!("Notification worker still busy after shutdown, abandoning"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
            info!("Received terminate signal, shutting down");
        },
    }
}

//! Neko Server binary
//!
//! Loads configuration, wires the yt-dlp fetcher into the job service and
//! serves the HTTP API until interrupted.

use anyhow::Context;
use neko_server::api;
use neko_server::config::Config;
use neko_server::fetcher::YtDlpFetcher;
use neko_server::service::JobService;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neko_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Neko Server...");

    let config = Config::from_env()?;
    config.validate()?;

    std::fs::create_dir_all(&config.download_dir).with_context(|| {
        format!(
            "Failed to create download directory {}",
            config.download_dir.display()
        )
    })?;

    tracing::info!(
        "Downloads go to {} ({} parallel, queue of {})",
        config.download_dir.display(),
        config.max_parallel_jobs,
        config.queue_capacity
    );

    let fetcher = YtDlpFetcher::new(config.ytdlp_path.clone(), config.download_dir.clone())
        .with_audio(config.audio_format.clone(), config.audio_quality.clone());
    let service = Arc::new(JobService::new(
        Arc::new(fetcher),
        config.service_settings(),
    ));

    // Build router with all API endpoints
    let app = api::create_router(Arc::clone(&service), &config.download_dir);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let pending = service.list().iter().filter(|job| !job.is_terminal()).count();
    if pending > 0 {
        tracing::warn!("Abandoning {} unfinished job(s)", pending);
    }

    tracing::info!("Neko Server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => tracing::warn!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

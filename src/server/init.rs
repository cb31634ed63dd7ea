//! Server initialization and main run loop
//!
//! Contains the main `run()` function that starts all server components.

use super::init_stores::{init_stores, resolve_data_dir};
use super::loader::load_config;
use crate::api::{api_router, CanvasApiState, SocialApiState};
use anyhow::{Context, Result};
use atelier_canvas::{CanvasSessionManager, CanvasState};
use atelier_social::SuggestionEngine;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

/// Run the server
pub async fn run() -> Result<()> {
    info!("Starting Atelier v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");

    let data_dir = resolve_data_dir(&config);
    info!("Data directory: {}", data_dir.display());

    let stores = init_stores(&data_dir).await?;

    // ── Canvas sessions ───────────────────────────────────────────────
    let session_manager = Arc::new(
        CanvasSessionManager::new()
            .with_default_settings(config.canvas.settings())
            .with_max_idle_secs(config.canvas.max_idle_secs)
            .with_max_sessions_per_user(config.canvas.max_sessions_per_user),
    );
    let canvas_state = Arc::new(CanvasState::new(session_manager.clone()));
    info!(
        width = config.canvas.width,
        height = config.canvas.height,
        max_sessions_per_user = config.canvas.max_sessions_per_user,
        "Canvas sessions enabled"
    );

    let cleanup_handle = start_session_cleanup(
        session_manager,
        Duration::from_secs(config.canvas.cleanup_interval_secs.max(1)),
    );

    // ── Social graph ──────────────────────────────────────────────────
    let suggestions =
        SuggestionEngine::with_config(stores.social_store.clone(), config.suggestions);

    let app = api_router(
        CanvasApiState {
            canvas: canvas_state,
            paintings: stores.painting_store,
        },
        SocialApiState::new(stores.social_store, suggestions),
    )
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("HTTP server error")?;

    cleanup_handle.abort();
    info!("Atelier shutdown complete");
    Ok(())
}

/// Periodically drop idle canvas sessions
fn start_session_cleanup(
    manager: Arc<CanvasSessionManager>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = manager.cleanup_expired().await;
            if removed > 0 {
                debug!(removed, "Expired canvas sessions removed");
            }
        }
    })
}

/// Wait for Ctrl+C or SIGTERM
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

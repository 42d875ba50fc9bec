//! `gsi-shot serve` -- HTTP listener for Dota 2 game state integration.
//!
//! Endpoints:
//! - POST /              - Game state snapshot from the game client
//! - GET  /ws            - Overlay payload stream (overlay mode)
//! - GET  /overlay/...   - Static overlay page and assets (overlay mode, when configured)
//!
//! Everything else answers 404 with an empty body.

mod handlers;
mod overlay;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use gsi_shot_core::{ensure_screenshot_dir, resolve_screenshot_dir, Config};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use self::handlers::{handle_gsi, handle_not_found};
use self::overlay::handle_overlay_socket;
use self::state::AppState;

/// Prepare the screenshot directory, then serve until Ctrl+C.
pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let screenshot_dir = prepare_screenshot_dir(&config)?;
    let state = Arc::new(AppState::from_config(&config, screenshot_dir));
    let app = router(state, &config);

    let addr = SocketAddr::new(config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening for GSI POST requests");
    info!(state = %config.gsi.trigger_state, "will trigger screenshot on transition");
    if config.overlay.enabled {
        info!(state = %config.overlay.broadcast_state, "overlay broadcast enabled on /ws");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

/// Create the screenshot directory. Failure is fatal only with `require_dir`.
fn prepare_screenshot_dir(config: &Config) -> Result<PathBuf, gsi_shot_core::Error> {
    match ensure_screenshot_dir(&config.screenshot.dir) {
        Ok(dir) => Ok(dir),
        Err(e) if config.screenshot.require_dir => Err(e),
        Err(e) => {
            error!(error = %e, "continuing without a screenshot directory");
            resolve_screenshot_dir(&config.screenshot.dir)
        }
    }
}

fn router(state: Arc<AppState>, config: &Config) -> Router {
    let mut app = Router::new().route("/", post(handle_gsi).fallback(handle_not_found));

    if config.overlay.enabled {
        app = app.route("/ws", get(handle_overlay_socket));
        if let Some(dir) = &config.overlay.static_dir {
            app = app.nest_service("/overlay", ServeDir::new(dir));
        }
        // Overlay pages are often loaded from file:// or a streaming tool's browser source.
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        );
    }

    app.fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .with_state(state)
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}

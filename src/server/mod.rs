//! # HTTP Server for Braille Conversion
//!
//! Accepts image uploads and answers with their Braille rendering.
//!
//! ## Usage
//!
//! ```bash
//! brailleart --listen 0.0.0.0:3000 --upload-dir /tmp
//! curl -F image=@photo.png http://localhost:3000/asci
//! ```
//!
//! Append `?scan=tiled` for the compact one-cell-per-2×4-block rendering.

mod handlers;
mod state;
pub mod upload;

pub use state::{DEFAULT_LISTEN_ADDR, DEFAULT_MAX_FILE_SIZE, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::BrailleError;
use state::AppState;

/// Build the application router.
pub fn router(config: ServerConfig) -> Router {
    let max_file_size = config.max_file_size;
    let app_state = Arc::new(AppState::new(config));

    Router::new()
        .route(
            "/asci",
            post(handlers::convert::convert).layer(DefaultBodyLimit::max(max_file_size)),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use brailleart::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), brailleart::error::BrailleError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), BrailleError> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            BrailleError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(
        listen = %config.listen_addr,
        upload_dir = %config.upload_dir.display(),
        max_file_size = config.max_file_size,
        allowed_mime = ?config.allowed_mime_prefixes,
        "brailleart server starting"
    );

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BrailleError::Server(e.to_string()))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

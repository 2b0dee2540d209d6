//! HTTP handlers for the server.

pub mod convert;

/// GET /health - Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

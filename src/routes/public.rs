use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints reachable without credentials. Nothing here touches the store.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers and container orchestration.
        .route("/health", get(|| async { "ok" }))
}

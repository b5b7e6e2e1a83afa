use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints served without consulting the navigation guard. The navigation API still
/// reads the caller's session, it just reports the decision instead of enforcing it.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/routes
        // The route table: names, patterns, auth requirement, lazy flag.
        .route("/api/routes", get(handlers::list_routes))
        // GET /api/navigate?path=...&from=...
        // Dry-runs the guard for the caller's session.
        .route("/api/navigate", get(handlers::navigate))
}

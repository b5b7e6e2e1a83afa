use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Page Router Module
///
/// Catches every browser navigation that is not an API call. Path resolution happens in
/// the navigation guard layer, so the handler only ever sees routes the guard allowed.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::render_page))
        .route("/{*path}", get(handlers::render_page))
}

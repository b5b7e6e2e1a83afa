use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::{
    auth::Session,
    error::NavigationError,
    models::{NavigateQuery, NavigationReport, RouteDescriptor},
    navigation::{NavigatorState, RouteMatch},
    views::{RenderContext, View, not_found_view},
};

// --- API Handlers ---

/// list_routes
///
/// [Public Route] Returns the route table in resolution order.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route table", body = [RouteDescriptor]))
)]
pub async fn list_routes(State(navigator): State<NavigatorState>) -> Json<Vec<RouteDescriptor>> {
    Json(navigator.table().routes().map(RouteDescriptor::from).collect())
}

/// navigate
///
/// [Public Route] Runs the guard for `path` against the caller's session without
/// rendering anything. The frontend calls this to mirror server-side decisions.
#[utoipa::path(
    get,
    path = "/api/navigate",
    params(NavigateQuery),
    responses(
        (status = 200, description = "Navigation decision", body = NavigationReport),
        (status = 500, description = "Broken route configuration")
    )
)]
pub async fn navigate(
    session: Session,
    State(navigator): State<NavigatorState>,
    Query(query): Query<NavigateQuery>,
) -> Result<Json<NavigationReport>, NavigationError> {
    let outcome = navigator.navigate(&query.path, query.from.as_deref(), &session)?;
    Ok(Json(NavigationReport::new(query.path, outcome)))
}

// --- Page Handlers ---

/// render_page
///
/// [Page Route] Renders the view of a route the navigation guard already let through.
/// The guard middleware stores the resolved `RouteMatch` in the request extensions.
pub async fn render_page(
    Extension(matched): Extension<RouteMatch>,
    session: Session,
    State(navigator): State<NavigatorState>,
    uri: Uri,
) -> Result<Html<String>, NavigationError> {
    let slot = navigator
        .table()
        .view(&matched)
        .ok_or_else(|| NavigationError::UnknownRoute(matched.name.clone()))?;
    let view = slot.resolve().await;

    let ctx = RenderContext {
        path: uri.path(),
        route: Some(&matched),
        session: &session,
    };
    Ok(Html(view.render(&ctx)))
}

/// render_not_found
///
/// Terminal page for paths outside the route table.
pub fn render_not_found(path: &str, session: &Session) -> Response {
    let ctx = RenderContext {
        path,
        route: None,
        session,
    };
    (StatusCode::NOT_FOUND, Html(not_found_view().render(&ctx))).into_response()
}

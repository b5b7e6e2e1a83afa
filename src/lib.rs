use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::{HeaderMap, HeaderName, Uri, header},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod views;

// HTTP surface split by guard treatment (public API vs guarded pages).
pub mod routes;
use routes::{pages, public};

// --- Public Re-exports ---

pub use auth::Session;
pub use config::AppConfig;
pub use error::{ConfigError, NavigationError};
pub use navigation::{NavigationOutcome, Navigator, NavigatorState};

/// ApiDoc
///
/// OpenAPI document for the JSON navigation API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::list_routes, handlers::navigate),
    components(schemas(
        models::RouteDescriptor,
        models::NavigationReport,
        models::DecisionKind,
    )),
    tags((name = "blog-navigator", description = "Blog SPA navigation API"))
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable state handed to every request: the navigator (route table plus
/// guard) and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub navigator: NavigatorState,
    pub config: AppConfig,
}

impl FromRef<AppState> for NavigatorState {
    fn from_ref(app_state: &AppState) -> NavigatorState {
        app_state.navigator.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// navigation_guard
///
/// Middleware in front of every page request; the HTTP counterpart of a before-each
/// navigation hook. It resolves the path, lets the guard decide, and then either
/// redirects (303 to the named route's location), answers the not-found page, or hands
/// the resolved route to the page handler through the request extensions.
async fn navigation_guard(
    State(navigator): State<NavigatorState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, NavigationError> {
    let path = request.uri().path().to_string();
    let from = referer_path(request.headers());

    match navigator.navigate(&path, from.as_deref(), &session)? {
        NavigationOutcome::Render(matched) => {
            request.extensions_mut().insert(matched);
            Ok(next.run(request).await)
        }
        NavigationOutcome::Redirect { location, .. } => Ok(Redirect::to(&location).into_response()),
        NavigationOutcome::NotFound => Ok(handlers::render_not_found(&path, &session)),
    }
}

// The page the user navigated from, taken from the Referer header.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .map(|uri| uri.path().to_string())
}

/// create_router
///
/// Assembles the routing structure, applies the navigation guard to the page routes and
/// wraps everything in the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Frontend bundle referenced by the page shell; never passes the navigation guard.
    let assets = ServeDir::new(&state.config.assets_dir);

    let base_router = Router::new()
        .nest_service("/assets", assets)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Pages: every navigation passes the guard before a view renders.
        .merge(
            pages::page_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                navigation_guard,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for each request, tagged with the `x-request-id` set by the layer above so all
/// log lines of one navigation correlate.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}

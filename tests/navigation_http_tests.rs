use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use blog_navigator::{
    AppConfig, AppState, Navigator, create_router,
    auth::Claims,
    config::Env,
    models::{DecisionKind, NavigationReport, RouteDescriptor},
    navigation::{AuthGuard, blog::blog_routes},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};
use tower::util::ServiceExt;
use uuid::Uuid;

// --- Test Setup ---

const TEST_JWT_SECRET: &str = "navigation-http-test-secret";

fn app_with_base(base: &str) -> axum::Router {
    app_with_config(AppConfig {
        env: Env::Production,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        base_url: base.to_string(),
        ..AppConfig::default()
    })
}

fn app_with_config(config: AppConfig) -> axum::Router {
    let navigator =
        Navigator::new(blog_routes().unwrap(), Arc::new(AuthGuard), &config.base_url).unwrap();

    create_router(AppState {
        navigator: Arc::new(navigator),
        config,
    })
}

fn app() -> axum::Router {
    app_with_base("/")
}

fn bearer() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let claims = Claims {
        sub: Uuid::from_u128(42),
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

async fn get(app: axum::Router, uri: &str, authenticated: bool) -> Response {
    let mut request = Request::builder().method("GET").uri(uri);
    if authenticated {
        request = request.header(header::AUTHORIZATION, bearer());
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// --- Pages ---

#[tokio::test]
async fn test_health_check() {
    let response = get(app(), "/health", false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_anonymous_protected_page_redirects_to_login() {
    for path in ["/add-post", "/graphql/post-list", "/graphql/post-edit/x", "/edit-post/x"] {
        let response = get(app(), path, false).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/login", "{path}");
    }
}

#[tokio::test]
async fn test_authenticated_protected_page_renders() {
    let response = get(app(), "/edit-post/abc-123", true).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains(r#"data-view="EditPost""#));
    assert!(html.contains(r#"data-param-slug="abc-123""#));
}

#[tokio::test]
async fn test_authenticated_login_redirects_home() {
    let response = get(app(), "/login", true).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_public_pages_render_for_everyone() {
    for authenticated in [false, true] {
        for path in ["/", "/about"] {
            let response = get(app(), path, authenticated).await;
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }
    let response = get(app(), "/login", false).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_lazy_about_page_renders_its_view() {
    let html = body_string(get(app(), "/about", false).await).await;
    assert!(html.contains(r#"data-view="AboutView""#));
}

#[tokio::test]
async fn test_unknown_page_is_not_found() {
    let response = get(app(), "/no/such/page", true).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("NotFoundView"));
}

#[tokio::test]
async fn test_history_base_prefixes_redirects() {
    let response = get(app_with_base("/blog"), "/blog/add-post", false).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/blog/login");

    let response = get(app_with_base("/blog"), "/add-post", false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let response = get(app(), "/", false).await;
    assert!(response.headers().contains_key("x-request-id"));
}

// --- Static Assets ---

#[tokio::test]
async fn test_assets_are_served_outside_the_guard() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.js"), "console.log('blog');").unwrap();
    let app = app_with_config(AppConfig {
        env: Env::Production,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        assets_dir: dir.path().to_string_lossy().into_owned(),
        ..AppConfig::default()
    });

    let response = get(app.clone(), "/assets/index.js", false).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "console.log('blog');");

    let response = get(app, "/assets/missing.js", false).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!body_string(response).await.contains("NotFoundView"));
}

// --- JSON API ---

#[tokio::test]
async fn test_list_routes() {
    let response = get(app(), "/api/routes", false).await;
    assert_eq!(response.status(), StatusCode::OK);

    let routes: Vec<RouteDescriptor> = serde_json::from_str(&body_string(response).await).unwrap();
    let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "home",
            "login",
            "add-post",
            "graphql-post-list",
            "graphql-post-edit",
            "edit-post",
            "about"
        ]
    );

    let edit = routes.iter().find(|r| r.name == "edit-post").unwrap();
    assert_eq!(edit.path, "/edit-post/:slug");
    assert!(edit.require_auth);
    assert_eq!(edit.params, vec!["slug".to_string()]);

    let about = routes.iter().find(|r| r.name == "about").unwrap();
    assert!(about.lazy);
    assert!(!about.require_auth);
}

#[tokio::test]
async fn test_navigate_report_for_anonymous_user() {
    let response = get(app(), "/api/navigate?path=/edit-post/abc-123&from=/", false).await;
    assert_eq!(response.status(), StatusCode::OK);

    let report: NavigationReport = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(report.path, "/edit-post/abc-123");
    assert_eq!(report.decision, DecisionKind::Redirect);
    assert_eq!(report.route.as_deref(), Some("login"));
    assert_eq!(report.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_navigate_report_for_authenticated_user() {
    let response = get(app(), "/api/navigate?path=/graphql/post-edit/my-slug", true).await;
    let report: NavigationReport = serde_json::from_str(&body_string(response).await).unwrap();

    assert_eq!(report.decision, DecisionKind::Proceed);
    assert_eq!(report.route.as_deref(), Some("graphql-post-edit"));
    assert_eq!(report.params.get("slug").map(String::as_str), Some("my-slug"));
    assert!(report.location.is_none());
}

#[tokio::test]
async fn test_navigate_report_not_found() {
    let response = get(app(), "/api/navigate?path=/missing", false).await;
    let body = body_string(response).await;

    assert!(body.contains(r#""decision":"not_found""#));
    assert!(!body.contains("location"));
}

#[tokio::test]
async fn test_navigate_requires_path() {
    let response = get(app(), "/api/navigate", false).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

use blog_navigator::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    navigation::{AuthGuard, Navigator, blog::blog_routes},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, validates the route table against the guard and
/// starts the HTTP server.
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_navigator=debug,tower_http=info".into());

    // Pretty output locally, JSON for log aggregation in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // Fail fast: a broken route table never serves traffic.
    let table = blog_routes().expect("FATAL: invalid route table");
    let navigator = Navigator::new(table, Arc::new(AuthGuard), &config.base_url)
        .expect("FATAL: route table does not satisfy the navigation guard");
    tracing::info!(
        routes = navigator.table().len(),
        base = navigator.base(),
        "route table validated"
    );

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        navigator: Arc::new(navigator),
        config,
    };
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}

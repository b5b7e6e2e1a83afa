use std::env;

/// AppConfig
///
/// Holds the service configuration. Loaded once at startup and shared read-only through
/// the application state via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local session bypass and log format.
    pub env: Env,
    // Secret used to validate access tokens (HS256).
    pub jwt_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // History base the SPA is mounted under, e.g. "/" or "/blog/".
    pub base_url: String,
    // Directory holding the built frontend bundle, served under /assets.
    pub assets_dir: String,
}

/// Env
///
/// Defines the runtime context: local development or production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_JWT_SECRET: &str = "local-development-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ASSETS_DIR: &str = "dist/assets";

impl Default for AppConfig {
    /// Test-friendly configuration that needs no environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            base_url: "/".to_string(),
            assets_dir: DEFAULT_ASSETS_DIR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the environment (`APP_ENV`, `JWT_SECRET`,
    /// `BIND_ADDR`, `BASE_URL`, `ASSETS_DIR`).
    ///
    /// # Panics
    /// Panics in production when `JWT_SECRET` is not set, so the service never starts
    /// validating tokens against a known development secret.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET").unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
        };

        Self {
            env,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "/".to_string()),
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| DEFAULT_ASSETS_DIR.to_string()),
        }
    }
}

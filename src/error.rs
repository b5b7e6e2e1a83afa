use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// ConfigError
///
/// Problems detected while assembling the route table. These are programmer errors
/// in the table declaration, so `main` refuses to start when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("route name `{0}` is declared more than once")]
    DuplicateRouteName(String),

    #[error("route `{route}` redirects to `{target}`, which is not declared")]
    MissingRedirectTarget { route: String, target: String },

    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// NavigationError
///
/// Failures while turning a navigation request into an outcome. Every variant points at
/// a broken table or guard configuration, so all of them answer 500.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no route is named `{0}`")]
    UnknownRoute(String),

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParam { route: String, param: String },

    #[error("redirect chain starting at `{0}` did not settle")]
    RedirectLoop(String),
}

impl IntoResponse for NavigationError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "navigation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

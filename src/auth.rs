use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

use crate::config::{AppConfig, Env};

/// Cookie the frontend stores the access token in, for plain page loads that cannot
/// attach an Authorization header.
pub const SESSION_COOKIE: &str = "access_token";

/// Development-only header that marks a request as authenticated as the given user id.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// Payload of the access tokens issued by the blog's auth layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id.
    pub sub: Uuid,
    /// Expiration Time (exp): seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat): seconds since the epoch.
    pub iat: usize,
}

/// Session
///
/// The authentication state a navigation is evaluated against. It is derived per request
/// and handed to the guard explicitly; nothing in this crate mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            expires_at: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// decode_session
///
/// Validates an HS256 access token. Any failure (bad signature, malformed, expired)
/// yields an anonymous session: a stale token only means "not logged in".
pub fn decode_session(token: &str, secret: &str) -> Session {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Session {
            user_id: Some(data.claims.sub),
            expires_at: DateTime::from_timestamp(data.claims.exp as i64, 0),
        },
        Err(e) => {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("access token expired"),
                kind => tracing::warn!(?kind, "access token rejected"),
            }
            Session::anonymous()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Session Extractor Implementation
///
/// Resolution order:
/// 1. Local bypass: in `Env::Local`, a UUID in `x-user-id` authenticates the request.
/// 2. Bearer token in the Authorization header.
/// 3. The `access_token` cookie.
///
/// Never rejects; a request without usable credentials gets an anonymous session and
/// the guard decides what that means for the target route.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let bypass = parts
                .headers
                .get(DEV_USER_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| Uuid::parse_str(value).ok());
            if let Some(user_id) = bypass {
                tracing::debug!(%user_id, "local session bypass");
                return Ok(Session::authenticated(user_id));
            }
        }

        let token = bearer_token(&parts.headers).or_else(|| cookie_token(&parts.headers));
        Ok(match token {
            Some(token) => decode_session(&token, &config.jwt_secret),
            None => Session::anonymous(),
        })
    }
}

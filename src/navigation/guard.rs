use std::sync::Arc;

use super::table::{RouteMatch, RouteTable};
use crate::{auth::Session, error::ConfigError};

pub const HOME: &str = "home";
pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";

/// Decision
///
/// What the guard wants done with a navigation: let it through, or send the user to a
/// different named route instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    RedirectTo(String),
}

impl Decision {
    pub fn redirect(name: &str) -> Self {
        Decision::RedirectTo(name.to_string())
    }
}

/// NavigationGuard Contract
///
/// Evaluated synchronously before every navigation. Implementations get the session as a
/// parameter and must not mutate it or perform I/O.
pub trait NavigationGuard: Send + Sync {
    fn evaluate(&self, to: &RouteMatch, from: Option<&RouteMatch>, session: &Session) -> Decision;

    /// Startup check that every redirect this guard can issue lands on a declared route.
    fn validate(&self, _table: &RouteTable) -> Result<(), ConfigError> {
        Ok(())
    }
}

pub type GuardState = Arc<dyn NavigationGuard>;

/// AuthGuard
///
/// The blog's authentication gate:
/// 1. protected route without a session -> `login`
/// 2. `login` with a session -> `home`
/// 3. `register` with a session -> `home`
/// 4. anything else proceeds
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

impl NavigationGuard for AuthGuard {
    fn evaluate(&self, to: &RouteMatch, from: Option<&RouteMatch>, session: &Session) -> Decision {
        let authenticated = session.is_authenticated();

        let decision = if to.meta.require_auth && !authenticated {
            Decision::redirect(LOGIN)
        } else if to.name == LOGIN && authenticated {
            Decision::redirect(HOME)
        } else if to.name == REGISTER && authenticated {
            Decision::redirect(HOME)
        } else {
            Decision::Proceed
        };

        tracing::debug!(
            to = %to.name,
            from = from.map(|r| r.name.as_str()).unwrap_or("-"),
            authenticated,
            ?decision,
            "guard evaluated"
        );
        decision
    }

    fn validate(&self, table: &RouteTable) -> Result<(), ConfigError> {
        if !table.contains(LOGIN) {
            if let Some(route) = table.routes().find(|r| r.meta().require_auth) {
                return Err(ConfigError::MissingRedirectTarget {
                    route: route.name().to_string(),
                    target: LOGIN.to_string(),
                });
            }
        }

        for guest_only in [LOGIN, REGISTER] {
            if table.contains(guest_only) && !table.contains(HOME) {
                return Err(ConfigError::MissingRedirectTarget {
                    route: guest_only.to_string(),
                    target: HOME.to_string(),
                });
            }
        }

        if !table.contains(REGISTER) {
            tracing::warn!(
                route = REGISTER,
                "guard has a redirect rule for a route that is not declared in the table"
            );
        }
        Ok(())
    }
}

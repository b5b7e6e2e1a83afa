//! Client-side navigation for the blog SPA, evaluated on the server:
//! path patterns, the route table, the authentication guard and the navigator that
//! ties them together.

pub mod blog;
pub mod guard;
pub mod pattern;
pub mod table;

use std::sync::Arc;

pub use guard::{AuthGuard, Decision, GuardState, NavigationGuard};
pub use pattern::{Params, PathPattern};
pub use table::{Route, RouteMatch, RouteMeta, RouteTable};

use crate::{
    auth::Session,
    error::{ConfigError, NavigationError},
};

// Redirect hops followed before a chain counts as a loop.
const MAX_REDIRECTS: usize = 8;

/// NavigationOutcome
///
/// The settled result of one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The guard let the requested route through.
    Render(RouteMatch),
    /// The guard substituted another route. `location` already carries the history base.
    Redirect { to: RouteMatch, location: String },
    /// No route matches the path.
    NotFound,
}

/// Navigator
///
/// Owns the immutable route table and the guard. Built once at startup; construction
/// fails when the guard can redirect to a route the table does not declare.
pub struct Navigator {
    table: RouteTable,
    guard: GuardState,
    base: String,
}

pub type NavigatorState = Arc<Navigator>;

impl Navigator {
    pub fn new(table: RouteTable, guard: GuardState, base: &str) -> Result<Self, ConfigError> {
        guard.validate(&table)?;
        Ok(Self {
            table,
            guard,
            base: normalize_base(base),
        })
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolves a browser path (history base included) against the table.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.strip_base(path).and_then(|p| self.table.resolve(p))
    }

    /// Browser location for a named route, history base included.
    pub fn location(&self, name: &str, params: &Params) -> Result<String, NavigationError> {
        let href = self.table.href(name, params)?;
        if self.base.is_empty() {
            Ok(href)
        } else {
            Ok(format!("{}{}", self.base, href))
        }
    }

    /// Runs one navigation to `path` coming from `from`. Redirect targets are
    /// re-evaluated by the guard until one proceeds.
    pub fn navigate(
        &self,
        path: &str,
        from: Option<&str>,
        session: &Session,
    ) -> Result<NavigationOutcome, NavigationError> {
        let Some(target) = self.resolve(path) else {
            tracing::debug!(path, "no route matches");
            return Ok(NavigationOutcome::NotFound);
        };
        let from = from.and_then(|p| self.resolve(p));

        let mut current = target.clone();
        let mut redirected = false;
        for _ in 0..=MAX_REDIRECTS {
            match self.guard.evaluate(&current, from.as_ref(), session) {
                Decision::Proceed if !redirected => return Ok(NavigationOutcome::Render(current)),
                Decision::Proceed => {
                    let location = self.location(&current.name, &current.params)?;
                    tracing::info!(from = %target.name, to = %current.name, %location, "navigation redirected");
                    return Ok(NavigationOutcome::Redirect {
                        to: current,
                        location,
                    });
                }
                Decision::RedirectTo(name) => {
                    current = self.table.resolve_named(&name, &Params::new())?;
                    redirected = true;
                }
            }
        }

        tracing::error!(path, route = %target.name, "redirect chain did not settle");
        Err(NavigationError::RedirectLoop(target.name))
    }

    fn strip_base<'p>(&self, path: &'p str) -> Option<&'p str> {
        if self.base.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.base.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

// "/" and "" mean no prefix; anything else becomes "/segment" without a trailing slash.
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

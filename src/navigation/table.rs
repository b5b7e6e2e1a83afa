use serde::Serialize;
use std::collections::HashSet;

use super::pattern::{Params, PathPattern};
use crate::{error::ConfigError, error::NavigationError, views::ViewSlot};

/// RouteMeta
///
/// Per-route metadata consulted by the navigation guard. Unset flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    pub require_auth: bool,
}

/// Route
///
/// One navigable location: a path pattern bound to a unique name and a view.
#[derive(Debug)]
pub struct Route {
    name: String,
    pattern: PathPattern,
    view: ViewSlot,
    meta: RouteMeta,
}

impl Route {
    pub fn new(path: &str, name: &str, view: ViewSlot) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.to_string(),
            pattern: PathPattern::parse(path)?,
            view,
            meta: RouteMeta::default(),
        })
    }

    /// Marks the route as reachable only with an authenticated session.
    pub fn requires_auth(mut self) -> Self {
        self.meta.require_auth = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn view(&self) -> &ViewSlot {
        &self.view
    }

    pub fn meta(&self) -> RouteMeta {
        self.meta
    }
}

/// RouteMatch
///
/// The result of resolving a path (or a route name) against the table. Owned so it can
/// travel through request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: String,
    pub params: Params,
    pub meta: RouteMeta,
    index: usize,
}

/// RouteTable
///
/// Ordered, immutable list of routes. Resolution is linear and the first declared match
/// wins.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Builds the table, rejecting duplicate route names.
    pub fn new(routes: Vec<Route>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert(route.name.as_str()) {
                return Err(ConfigError::DuplicateRouteName(route.name.clone()));
            }
        }
        Ok(Self { routes })
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.route(name).is_some()
    }

    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().enumerate().find_map(|(index, route)| {
            route.pattern.matches(path).map(|params| RouteMatch {
                name: route.name.clone(),
                params,
                meta: route.meta,
                index,
            })
        })
    }

    /// Resolves a named navigation target. Every parameter of the route's pattern must
    /// be supplied.
    pub fn resolve_named(&self, name: &str, params: &Params) -> Result<RouteMatch, NavigationError> {
        let (index, route) = self
            .routes
            .iter()
            .enumerate()
            .find(|(_, r)| r.name == name)
            .ok_or_else(|| NavigationError::UnknownRoute(name.to_string()))?;

        let mut captured = Params::new();
        for param in route.pattern.param_names() {
            let value = params
                .get(param)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NavigationError::MissingParam {
                    route: name.to_string(),
                    param: param.to_string(),
                })?;
            captured.insert(param.to_string(), value.clone());
        }

        Ok(RouteMatch {
            name: route.name.clone(),
            params: captured,
            meta: route.meta,
            index,
        })
    }

    /// Builds the path for a named route, percent-encoding parameter values.
    pub fn href(&self, name: &str, params: &Params) -> Result<String, NavigationError> {
        let route = self
            .route(name)
            .ok_or_else(|| NavigationError::UnknownRoute(name.to_string()))?;
        route
            .pattern
            .build(params)
            .map_err(|param| NavigationError::MissingParam {
                route: name.to_string(),
                param: param.to_string(),
            })
    }

    /// The view bound to a match produced by this table.
    pub fn view(&self, matched: &RouteMatch) -> Option<&ViewSlot> {
        self.routes
            .get(matched.index)
            .filter(|route| route.name == matched.name)
            .map(|route| &route.view)
    }
}

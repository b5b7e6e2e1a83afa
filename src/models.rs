use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::navigation::{NavigationOutcome, Route};

/// RouteDescriptor
///
/// Public view of one route table entry (GET /api/routes).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct RouteDescriptor {
    pub name: String,
    /// Path pattern, `:name` segments are parameters.
    #[schema(example = "/edit-post/:slug")]
    pub path: String,
    pub require_auth: bool,
    /// True when the view is loaded on first visit.
    pub lazy: bool,
    pub params: Vec<String>,
}

impl From<&Route> for RouteDescriptor {
    fn from(route: &Route) -> Self {
        Self {
            name: route.name().to_string(),
            path: route.pattern().as_str().to_string(),
            require_auth: route.meta().require_auth,
            lazy: route.view().is_lazy(),
            params: route.pattern().param_names().map(str::to_string).collect(),
        }
    }
}

/// DecisionKind
///
/// How a navigation settled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DecisionKind {
    Proceed,
    Redirect,
    NotFound,
}

/// NavigationReport
///
/// Result of dry-running a navigation for the caller's session
/// (GET /api/navigate). Lets the frontend share the server's routing decisions.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct NavigationReport {
    /// The path that was asked about.
    pub path: String,
    pub decision: DecisionKind,
    /// Route the navigation ends on, absent when not found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub params: BTreeMap<String, String>,
    /// Where the browser should go, present for redirects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl NavigationReport {
    pub fn new(path: String, outcome: NavigationOutcome) -> Self {
        match outcome {
            NavigationOutcome::Render(matched) => Self {
                path,
                decision: DecisionKind::Proceed,
                route: Some(matched.name),
                params: matched.params,
                location: None,
            },
            NavigationOutcome::Redirect { to, location } => Self {
                path,
                decision: DecisionKind::Redirect,
                route: Some(to.name),
                params: to.params,
                location: Some(location),
            },
            NavigationOutcome::NotFound => Self {
                path,
                decision: DecisionKind::NotFound,
                route: None,
                params: BTreeMap::new(),
                location: None,
            },
        }
    }
}

/// NavigateQuery
///
/// Query parameters for GET /api/navigate.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NavigateQuery {
    /// Target path, e.g. `/edit-post/abc-123`.
    pub path: String,
    /// Path the navigation starts from.
    pub from: Option<String>,
}

use async_trait::async_trait;
use std::{fmt, sync::Arc};
use tokio::sync::OnceCell;

use crate::{auth::Session, navigation::RouteMatch};

/// RenderContext
///
/// Everything a view may look at while rendering: the requested path, the route it
/// resolved to (absent for the not-found view) and the caller's session.
pub struct RenderContext<'a> {
    pub path: &'a str,
    pub route: Option<&'a RouteMatch>,
    pub session: &'a Session,
}

/// View Contract
///
/// An opaque renderable unit bound to one route. The blog UI itself lives in the
/// frontend bundle, so the default rendering is the SPA shell: a mount point that names
/// the component and carries the route parameters as `data-*` attributes. The shell
/// loads the bundle from `/assets`, which `create_router` serves from `ASSETS_DIR`.
pub trait View: Send + Sync {
    /// Name of the frontend component mounted for this view.
    fn component(&self) -> &str;

    fn title(&self) -> &str;

    fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut attrs = format!(
            r#" data-view="{}" data-path="{}""#,
            escape(self.component()),
            escape(ctx.path)
        );
        if let Some(route) = ctx.route {
            attrs.push_str(&format!(r#" data-route="{}""#, escape(&route.name)));
            for (key, value) in &route.params {
                attrs.push_str(&format!(r#" data-param-{}="{}""#, escape(key), escape(value)));
            }
        }
        if ctx.session.is_authenticated() {
            attrs.push_str(r#" data-authenticated="true""#);
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<script type=\"module\" src=\"/assets/index.js\"></script>\n\
             </head>\n<body>\n<div id=\"app\"{attrs}></div>\n</body>\n</html>\n",
            title = escape(self.title()),
        )
    }
}

/// SpaComponent
///
/// The concrete view used for every blog page: a named frontend component plus its
/// document title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaComponent {
    component: String,
    title: String,
}

impl SpaComponent {
    pub fn new(component: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            title: title.into(),
        }
    }
}

impl View for SpaComponent {
    fn component(&self) -> &str {
        &self.component
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Terminal view for paths that match no route.
pub fn not_found_view() -> SpaComponent {
    SpaComponent::new("NotFoundView", "Page not found")
}

/// ViewFactory Contract
///
/// Produces a view on demand. Used for routes whose view is split out of the main
/// bundle and only fetched the first time someone navigates there.
#[async_trait]
pub trait ViewFactory: Send + Sync {
    async fn load(&self) -> Arc<dyn View>;
}

/// LazyView
///
/// Wraps a factory so it runs at most once. Concurrent first visits wait on the same
/// initialization and every later visit gets the cached view.
pub struct LazyView {
    factory: Box<dyn ViewFactory>,
    cell: OnceCell<Arc<dyn View>>,
}

impl LazyView {
    pub fn new(factory: impl ViewFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Arc<dyn View> {
        self.cell
            .get_or_init(|| async move {
                let view = self.factory.load().await;
                tracing::debug!(component = view.component(), "lazy view loaded");
                view
            })
            .await
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

/// ViewSlot
///
/// How a route holds its view: ready at startup, or deferred until first navigation.
pub enum ViewSlot {
    Eager(Arc<dyn View>),
    Lazy(LazyView),
}

impl ViewSlot {
    pub fn eager(view: impl View + 'static) -> Self {
        ViewSlot::Eager(Arc::new(view))
    }

    pub fn lazy(factory: impl ViewFactory + 'static) -> Self {
        ViewSlot::Lazy(LazyView::new(factory))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, ViewSlot::Lazy(_))
    }

    pub async fn resolve(&self) -> Arc<dyn View> {
        match self {
            ViewSlot::Eager(view) => view.clone(),
            ViewSlot::Lazy(lazy) => lazy.get().await,
        }
    }
}

impl fmt::Debug for ViewSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSlot::Eager(view) => write!(f, "Eager({})", view.component()),
            ViewSlot::Lazy(lazy) => write!(f, "Lazy(loaded: {})", lazy.is_loaded()),
        }
    }
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

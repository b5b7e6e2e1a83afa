use async_trait::async_trait;
use std::sync::Arc;

use super::table::{Route, RouteTable};
use crate::{
    error::ConfigError,
    views::{SpaComponent, View, ViewFactory, ViewSlot},
};

/// AboutViewLoader
///
/// The about page ships as its own chunk and is only loaded on first visit.
#[derive(Debug, Default)]
pub struct AboutViewLoader;

#[async_trait]
impl ViewFactory for AboutViewLoader {
    async fn load(&self) -> Arc<dyn View> {
        tracing::info!(chunk = "about", "loading deferred view");
        Arc::new(SpaComponent::new("AboutView", "About"))
    }
}

/// blog_routes
///
/// The blog frontend's route table, in resolution order.
pub fn blog_routes() -> Result<RouteTable, ConfigError> {
    RouteTable::new(vec![
        Route::new("/", "home", ViewSlot::eager(SpaComponent::new("HomeView", "Home")))?,
        Route::new(
            "/login",
            "login",
            ViewSlot::eager(SpaComponent::new("LoginPage", "Log in")),
        )?,
        Route::new(
            "/add-post",
            "add-post",
            ViewSlot::eager(SpaComponent::new("CreateBlogPost", "New post")),
        )?
        .requires_auth(),
        Route::new(
            "/graphql/post-list",
            "graphql-post-list",
            ViewSlot::eager(SpaComponent::new("GraphQLPostList", "Posts")),
        )?
        .requires_auth(),
        Route::new(
            "/graphql/post-edit/:slug",
            "graphql-post-edit",
            ViewSlot::eager(SpaComponent::new("GraphQLPostEdit", "Edit post")),
        )?
        .requires_auth(),
        Route::new(
            "/edit-post/:slug",
            "edit-post",
            ViewSlot::eager(SpaComponent::new("EditPost", "Edit post")),
        )?
        .requires_auth(),
        Route::new("/about", "about", ViewSlot::lazy(AboutViewLoader))?,
    ])
}

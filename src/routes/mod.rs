//! Splits the HTTP surface by how requests are treated:
//! the JSON API answers directly, page requests pass the navigation guard first.

/// Health check and the JSON navigation API. No guard applied.
pub mod public;

/// SPA pages. Wrapped in the navigation guard middleware by `create_router`.
pub mod pages;

//! API routes module
//!
//! Everything returned by [`routes`] is nested under `/api` by
//! `axum_helpers::create_router`; [`pages`] is served from the root.

pub mod health;
pub mod items;
pub mod pages;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/items", items::router(state))
        .merge(health::router(state.clone()))
}

//! HTML views for the HTMX frontend
//!
//! This module contains route handlers that render Askama templates for the
//! browse grid, the movie detail view and the session transitions driving
//! them.

pub mod movies;
pub mod utils;

use askama::Template;
use axum::{
    http::{StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::AppState;

#[derive(Template)]
#[template(path = "pages/404.html")]
pub struct NotFoundTemplate {
    pub path: String,
}

/// 404 handler
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            path: uri.path().to_string(),
        },
    )
}

/// Build the HTML routes for the frontend
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::browse))
        // Session transitions; each re-renders the browse page afterwards
        .route("/movies/:id/select", post(movies::select_movie))
        .route("/back", post(movies::back))
        .route("/page/next", post(movies::next_page))
        .route("/page/prev", post(movies::previous_page))
        .route("/surprise", post(movies::surprise))
}

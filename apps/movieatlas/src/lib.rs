//! MovieAtlas Library
//!
//! Core functionality for the MovieAtlas movie discovery frontend.
//! This library exposes modules for use in integration tests.

use axum::http::{header, Method};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod response;
pub mod services;
pub mod session;
pub mod static_files;
pub mod views;

use config::Config;
use services::TmdbClient;
use session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Get a reference to the TMDB client.
    pub fn tmdb(&self) -> &TmdbClient {
        &self.tmdb
    }

    /// Get a reference to the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[derive(Serialize)]
pub struct ApiResponse {
    pub message: String,
    pub version: String,
}

pub async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        message: "MovieAtlas is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the complete application router.
///
/// Shared by `main` and the integration tests so both run the same routes.
pub fn router(state: AppState) -> Router {
    // Build the JSON API routes
    let api_routes = Router::new()
        .route("/genres", get(api::movies::list_genres))
        .route("/movies", get(api::movies::discover_movies))
        .route("/movies/:id", get(api::movies::get_movie))
        .route("/search/person", get(api::movies::search_person));

    // Configure CORS based on allowed origins from config
    // If no origins configured, only same-origin requests are allowed
    let cors = if state.config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .max_age(std::time::Duration::from_secs(3600))
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        tracing::info!("CORS: Allowing origins {:?}", state.config.server.cors_origins);
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        // Static assets (CSS)
        .route("/static/*path", get(static_files::serve_static))
        // Health check
        .route("/health", get(health_check))
        // HTMX HTML routes (served at root)
        .merge(views::routes())
        // JSON API routes (under /api)
        .nest("/api", api_routes)
        // 404 fallback
        .fallback(views::not_found)
        .layer(cors)
        .with_state(state)
}

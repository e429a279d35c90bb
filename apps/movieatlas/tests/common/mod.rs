//! Test infrastructure for MovieAtlas integration tests.
//!
//! Provides a `TestApp` wrapper around `axum_test::TestServer` backed by a
//! wiremock TMDB stub, with helper methods for mounting the common upstream
//! fixtures.

#![allow(dead_code)]

use axum_test::{TestServer, TestServerConfig};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use movieatlas::config::{Config, ServerConfig, TmdbConfig};
use movieatlas::services::TmdbClient;
use movieatlas::session::SessionStore;
use movieatlas::{router, AppState};

/// Test application wrapper around axum_test::TestServer.
pub struct TestApp {
    server: TestServer,
    pub tmdb: MockServer,
}

impl TestApp {
    /// Create a new test application whose TMDB client points at a fresh
    /// wiremock server. Cookies are persisted between requests so session
    /// state behaves like a browser.
    pub async fn new() -> Self {
        let tmdb = MockServer::start().await;

        let config = Config {
            server: ServerConfig::default(),
            tmdb: TmdbConfig {
                access_token: Some("test-token".to_string()),
                base_url: tmdb.uri(),
                image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
                timeout_secs: 5,
            },
        };

        let state = AppState {
            tmdb: TmdbClient::new_shared(&config.tmdb).expect("Failed to create TMDB client"),
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
        };

        let app = router(state);

        let server = TestServer::new_with_config(
            app,
            TestServerConfig {
                save_cookies: true,
                ..TestServerConfig::default()
            },
        )
        .expect("Failed to create test server");

        Self { server, tmdb }
    }

    pub fn server(&self) -> &TestServer {
        &self.server
    }

    /// Mount a standard genre catalog.
    pub async fn mock_genres(&self) {
        Mock::given(method("GET"))
            .and(path("/genre/movie/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "genres": [
                    {"id": 28, "name": "Action"},
                    {"id": 35, "name": "Comedy"},
                    {"id": 18, "name": "Drama"},
                    {"id": 9648, "name": "Mystery"},
                    {"id": 878, "name": "Science Fiction"},
                    {"id": 53, "name": "Thriller"}
                ]
            })))
            .mount(&self.tmdb)
            .await;
    }

    /// Mount a discovery page for a given `page` query value.
    pub async fn mock_discover_page(&self, page: &str, titles: &[&str], total_pages: u32) {
        let results: Vec<serde_json::Value> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                serde_json::json!({
                    "id": 1000 + i,
                    "title": title,
                    "poster_path": format!("/poster-{}.jpg", i),
                    "vote_average": 7.5,
                    "vote_count": 1200
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": results,
                "total_pages": total_pages
            })))
            .mount(&self.tmdb)
            .await;
    }

    /// Mount a person search answer for a given name.
    pub async fn mock_person(&self, name: &str, id: Option<u64>) {
        let results = match id {
            Some(id) => serde_json::json!([{"id": id, "name": name}]),
            None => serde_json::json!([]),
        };
        Mock::given(method("GET"))
            .and(path("/search/person"))
            .and(query_param("query", name))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"results": results})),
            )
            .mount(&self.tmdb)
            .await;
    }

    /// Mount movie details for an id.
    pub async fn mock_movie_details(&self, id: u64, title: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/movie/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": id,
                "title": title,
                "overview": "A thief who steals corporate secrets.",
                "poster_path": "/detail.jpg",
                "vote_average": 8.4,
                "vote_count": 30123,
                "runtime": 148,
                "release_date": "2010-07-16",
                "tagline": "Your mind is the scene of the crime.",
                "homepage": "https://example.com/inception",
                "imdb_id": "tt1375666",
                "genres": [
                    {"id": 28, "name": "Action"},
                    {"id": 878, "name": "Science Fiction"}
                ],
                "credits": {
                    "cast": [
                        {"name": "Leonardo DiCaprio", "character": "Cobb"},
                        {"name": "Joseph Gordon-Levitt", "character": "Arthur"}
                    ],
                    "crew": [
                        {"name": "Christopher Nolan", "job": "Director"}
                    ]
                }
            })))
            .mount(&self.tmdb)
            .await;
    }
}

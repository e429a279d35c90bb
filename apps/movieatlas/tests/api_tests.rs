//! Integration tests for the JSON API endpoints.

mod common;

use common::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.server().get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "MovieAtlas is running");
}

// =============================================================================
// Genres
// =============================================================================

#[tokio::test]
async fn test_list_genres_sorted_by_name() {
    let app = TestApp::new().await;
    app.mock_genres().await;

    let response = app.server().get("/api/genres").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Action", "Comedy", "Drama", "Mystery", "Science Fiction", "Thriller"]
    );
}

#[tokio::test]
async fn test_list_genres_upstream_down_is_empty_list() {
    let app = TestApp::new().await;
    // No mock mounted: the stub answers 404 and the client degrades

    let response = app.server().get("/api/genres").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

// =============================================================================
// Person search
// =============================================================================

#[tokio::test]
async fn test_search_person_requires_query() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/search/person?q=").await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_search_person_found() {
    let app = TestApp::new().await;
    app.mock_person("Tom Hanks", Some(31)).await;

    let response = app.server().get("/api/search/person?q=Tom%20Hanks").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], 31);
    assert_eq!(body["query"], "Tom Hanks");
}

#[tokio::test]
async fn test_search_person_not_found_is_null() {
    let app = TestApp::new().await;
    app.mock_person("Nobody Anybody", None).await;

    let response = app.server().get("/api/search/person?q=Nobody%20Anybody").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["id"].is_null());
}

// =============================================================================
// Discovery
// =============================================================================

#[tokio::test]
async fn test_discover_movies_page_shape() {
    let app = TestApp::new().await;
    app.mock_genres().await;
    app.mock_discover_page("1", &["The Matrix", "Inception"], 7).await;

    let response = app.server().get("/api/movies?min_rating=7").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["items"][0]["title"], "The Matrix");
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_pages"], 7);
    assert_eq!(body["max_display_page"], 7);
    assert_eq!(body["director_ignored"], false);
}

#[tokio::test]
async fn test_discover_upstream_down_yields_min_display_page() {
    let app = TestApp::new().await;
    // No mocks at all: discovery degrades to an empty page

    let response = app.server().get("/api/movies").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["total_pages"], 0);
    // Pagination never collapses below one displayable page
    assert_eq!(body["max_display_page"], 1);
}

#[tokio::test]
async fn test_discover_actor_wins_over_director() {
    let app = TestApp::new().await;
    app.mock_genres().await;
    app.mock_person("Tom Hanks", Some(31)).await;
    app.mock_person("Christopher Nolan", Some(525)).await;
    app.mock_discover_page("1", &["Cast Away"], 1).await;

    let response = app
        .server()
        .get("/api/movies?actor=Tom%20Hanks&director=Christopher%20Nolan")
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["director_ignored"], true);

    // The discovery request carried the cast filter and no crew filter
    let discover_requests: Vec<_> = app
        .tmdb
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/discover/movie")
        .collect();
    assert!(!discover_requests.is_empty());
    let query: Vec<(String, String)> = discover_requests
        .last()
        .unwrap()
        .url
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert!(query.contains(&("with_people".to_string(), "31".to_string())));
    assert!(!query.iter().any(|(k, _)| k == "with_crew"));
}

// =============================================================================
// Movie details
// =============================================================================

#[tokio::test]
async fn test_get_movie_details() {
    let app = TestApp::new().await;
    app.mock_movie_details(27205, "Inception").await;

    let response = app.server().get("/api/movies/27205").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Inception");
    assert_eq!(body["runtime"], 148);
    assert_eq!(body["director"], "Christopher Nolan");
    assert_eq!(body["genres"][0], "Action");
    assert_eq!(body["cast"][0], "Leonardo DiCaprio");
    assert_eq!(
        body["poster_url"],
        "https://image.tmdb.org/t/p/w500/detail.jpg"
    );
}

#[tokio::test]
async fn test_get_movie_details_not_found() {
    let app = TestApp::new().await;
    // No mock: upstream 404s

    let response = app.server().get("/api/movies/424242").await;
    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
}

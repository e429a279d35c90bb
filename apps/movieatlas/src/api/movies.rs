//! Movie discovery API endpoints.
//!
//! The JSON twin of the HTML views: the same filter vocabulary, stateless.
//! Session bookkeeping (pagination memory, person-lookup memoization) is a
//! views concern; here repeated lookups are deduplicated by the client's
//! response cache instead.

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::discover::{
    self, FilterSelection, MoodCatalog, ALL_SENTINEL, ANY_LANGUAGE, DEFAULT_MIN_RATING,
    DEFAULT_YEAR_RANGE, MAX_YEAR, MIN_YEAR,
};
use crate::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Filter parameters shared by the JSON discovery endpoint and the browse
/// page. Multi-valued keys (`genre`, `language`) repeat in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub year_from: Option<u16>,
    pub year_to: Option<u16>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub mood: Option<String>,
    #[serde(default)]
    pub language: Vec<String>,
    pub actor: Option<String>,
    pub director: Option<String>,
    pub min_rating: Option<f64>,
    /// Page for the stateless API; the browse page tracks it in the session.
    pub page: Option<u32>,
}

impl FilterParams {
    /// Normalize raw request parameters into a filter selection, clamping
    /// out-of-range values to the UI's widget bounds.
    pub fn selection(&self) -> FilterSelection {
        let mut from = self.year_from.unwrap_or(DEFAULT_YEAR_RANGE.0).clamp(MIN_YEAR, MAX_YEAR);
        let mut to = self.year_to.unwrap_or(DEFAULT_YEAR_RANGE.1).clamp(MIN_YEAR, MAX_YEAR);
        if from > to {
            std::mem::swap(&mut from, &mut to);
        }

        let genres = if self.genre.is_empty() {
            vec![ALL_SENTINEL.to_string()]
        } else {
            self.genre.clone()
        };
        let languages = if self.language.is_empty() {
            vec![ANY_LANGUAGE.to_string()]
        } else {
            self.language.clone()
        };

        FilterSelection {
            year_range: (from, to),
            genres,
            mood: self
                .mood
                .clone()
                .unwrap_or_else(|| ALL_SENTINEL.to_string()),
            min_rating: self
                .min_rating
                .unwrap_or(DEFAULT_MIN_RATING)
                .clamp(0.0, 10.0),
            languages,
            actor_name: self.actor.clone().unwrap_or_default().trim().to_string(),
            director_name: self
                .director
                .clone()
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }
}

/// Genre catalog entry.
#[derive(Debug, Serialize)]
pub struct GenreDto {
    pub id: u32,
    pub name: String,
}

/// Query parameters for person search.
#[derive(Debug, Deserialize)]
pub struct PersonSearchQuery {
    /// Person name to resolve.
    pub q: String,
}

/// Person resolution result; `id` is null when nobody matched.
#[derive(Debug, Serialize)]
pub struct PersonDto {
    pub query: String,
    pub id: Option<u64>,
}

/// One movie in a discovery page.
#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
}

/// A discovery page plus the pagination bookkeeping the UI needs.
#[derive(Debug, Serialize)]
pub struct DiscoverPageDto {
    pub items: Vec<MovieDto>,
    pub page: u32,
    pub total_pages: u32,
    pub max_display_page: u32,
    /// True when both actor and director were given and the director filter
    /// was dropped under the actor-wins precedence rule.
    pub director_ignored: bool,
}

/// Full movie details.
#[derive(Debug, Serialize)]
pub struct MovieDetailsDto {
    pub id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    pub cast: Vec<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/genres
///
/// The movie genre catalog, sorted by name. An empty list means genre
/// filtering is currently unavailable upstream.
pub async fn list_genres(State(state): State<AppState>) -> Json<Vec<GenreDto>> {
    let mut genres: Vec<GenreDto> = state
        .tmdb
        .genres()
        .await
        .into_iter()
        .map(|(id, name)| GenreDto { id, name })
        .collect();
    genres.sort_by(|a, b| a.name.cmp(&b.name));
    Json(genres)
}

/// GET /api/search/person
///
/// Resolves a person name to the first-ranked TMDB person id.
pub async fn search_person(
    State(state): State<AppState>,
    Query(query): Query<PersonSearchQuery>,
) -> Result<Json<PersonDto>> {
    let name = query.q.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }
    if name.len() > 200 {
        return Err(AppError::BadRequest(
            "Search query too long (max 200 characters)".to_string(),
        ));
    }

    let id = state.tmdb.search_person(name).await;
    Ok(Json(PersonDto {
        query: name.to_string(),
        id,
    }))
}

/// GET /api/movies
///
/// One page of filtered movie discovery.
pub async fn discover_movies(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<DiscoverPageDto> {
    let selection = params.selection();
    let genre_catalog = state.tmdb.genres().await;
    let moods = MoodCatalog::from_genres(&genre_catalog);

    let mut query = discover::build_query(&selection, &genre_catalog, &moods);

    let actor_id = if selection.actor_name.is_empty() {
        None
    } else {
        state.tmdb.search_person(&selection.actor_name).await
    };
    let director_id = if selection.director_name.is_empty() {
        None
    } else {
        state.tmdb.search_person(&selection.director_name).await
    };
    let person_filter = discover::apply_person_filter(&mut query, actor_id, director_id);

    let page = params.page.unwrap_or(1).max(1);
    let (movies, total_pages) = state.tmdb.discover(&query, page).await;

    let items = movies
        .into_iter()
        .map(|movie| MovieDto {
            title: movie.display_title().to_string(),
            poster_url: movie
                .poster_path
                .as_deref()
                .map(|p| state.tmdb.poster_url(p)),
            id: movie.id,
            poster_path: movie.poster_path,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
        })
        .collect();

    Json(DiscoverPageDto {
        items,
        page,
        total_pages,
        max_display_page: discover::max_display_page(total_pages),
        director_ignored: matches!(person_filter, discover::PersonFilter::ActorWins { .. }),
    })
}

/// GET /api/movies/:id
///
/// Full details for one movie, credits included.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MovieDetailsDto>> {
    let details = state
        .tmdb
        .movie_details(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("movie {}", id)))?;

    let director = details.director().map(|name| name.to_string());
    let cast = details
        .top_cast(10)
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    Ok(Json(MovieDetailsDto {
        id: details.id,
        title: details.display_title().to_string(),
        poster_url: details
            .poster_path
            .as_deref()
            .map(|p| state.tmdb.poster_url(p)),
        overview: details.overview.clone(),
        poster_path: details.poster_path.clone(),
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        runtime: details.runtime,
        release_date: details.release_date.clone(),
        tagline: details.tagline.clone(),
        homepage: details.homepage.clone(),
        imdb_id: details.imdb_id.clone(),
        genres: details.genres.iter().map(|g| g.name.clone()).collect(),
        director,
        cast,
    }))
}

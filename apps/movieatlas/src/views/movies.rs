//! Browse and detail views.
//!
//! The browse page owns the whole discovery flow: it rebuilds the filter
//! selection from the query string on every render, resolves person filters
//! through the session memo, runs the discovery (or surprise) fetch and
//! renders grid, pagination and notices. Transition endpoints mutate session
//! state and redirect back to the browse page with the filters preserved.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::{header::HeaderName, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form, Query};
use uuid::Uuid;

use crate::api::movies::FilterParams;
use crate::response::ContentNegotiation;
use crate::services::discover::{
    self, FilterSelection, MoodCatalog, PersonFilter, ALL_SENTINEL, ANY_LANGUAGE, MAX_YEAR,
    MIN_YEAR, SUPPORTED_LANGUAGES,
};
use crate::services::tmdb::MovieDetails;
use crate::session::{ensure_session, Event};
use crate::AppState;

use super::utils::{format_rating, format_runtime};

// =============================================================================
// Templates and view models
// =============================================================================

#[derive(Template)]
#[template(path = "pages/browse.html")]
pub struct BrowseTemplate {
    pub heading: String,
    pub notices: Vec<Notice>,
    pub surprise_caption: Option<String>,
    pub movies: Vec<MovieCard>,
    pub page: u32,
    pub max_display_page: u32,
    pub show_pagination: bool,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub filters: SidebarContext,
}

#[derive(Template)]
#[template(path = "pages/movie_detail.html")]
pub struct MovieDetailTemplate {
    pub movie: Option<DetailView>,
    pub notices: Vec<Notice>,
    pub filters: SidebarContext,
}

/// A transient banner above the grid.
pub struct Notice {
    pub level: &'static str,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: "info",
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            level: "warning",
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: "error",
            text: text.into(),
        }
    }
}

/// One movie card in the grid.
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    /// Short rating label ("8.3"); None renders the N/A placeholder instead
    /// of a details button.
    pub rating: Option<String>,
}

/// Fully formatted detail view data.
pub struct DetailView {
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: String,
    pub genres: String,
    pub rating: String,
    pub runtime: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub homepage: Option<String>,
    pub imdb_url: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
}

/// Everything the sidebar form needs to re-render with its current values,
/// and the hidden-field partial needs to carry them through transitions.
pub struct SidebarContext {
    pub year_from: u16,
    pub year_to: u16,
    pub min_year: u16,
    pub max_year: u16,
    pub min_rating: String,
    pub genre_options: Vec<SelectOption>,
    pub mood_options: Vec<SelectOption>,
    pub language_options: Vec<SelectOption>,
    pub actor_name: String,
    pub director_name: String,
}

pub struct SelectOption {
    pub name: String,
    pub selected: bool,
}

fn select_options<'a, I>(names: I, selected: &[String]) -> Vec<SelectOption>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| SelectOption {
            selected: selected.iter().any(|s| s == name),
            name: name.to_string(),
        })
        .collect()
}

fn sidebar_context(
    selection: &FilterSelection,
    genre_catalog: &std::collections::HashMap<u32, String>,
    moods: &MoodCatalog,
) -> SidebarContext {
    let mut genre_names: Vec<&str> = genre_catalog.values().map(|s| s.as_str()).collect();
    genre_names.sort_unstable();
    let mut genre_options = vec![ALL_SENTINEL.to_string()];
    genre_options.extend(genre_names.iter().map(|s| s.to_string()));

    let mut mood_options = vec![ALL_SENTINEL.to_string()];
    mood_options.extend(moods.names());

    let mut language_options = vec![ANY_LANGUAGE.to_string()];
    language_options.extend(SUPPORTED_LANGUAGES.iter().map(|(name, _)| name.to_string()));

    SidebarContext {
        year_from: selection.year_range.0,
        year_to: selection.year_range.1,
        min_year: MIN_YEAR,
        max_year: MAX_YEAR,
        min_rating: format!("{}", selection.min_rating),
        genre_options: select_options(
            genre_options.iter().map(|s| s.as_str()),
            &selection.genres,
        ),
        mood_options: select_options(
            mood_options.iter().map(|s| s.as_str()),
            std::slice::from_ref(&selection.mood),
        ),
        language_options: select_options(
            language_options.iter().map(|s| s.as_str()),
            &selection.languages,
        ),
        actor_name: selection.actor_name.clone(),
        director_name: selection.director_name.clone(),
    }
}

fn movie_cards(state: &AppState, movies: Vec<crate::services::tmdb::MovieSummary>) -> Vec<MovieCard> {
    movies
        .into_iter()
        .map(|movie| MovieCard {
            title: movie.display_title().to_string(),
            poster_url: movie
                .poster_path
                .as_deref()
                .map(|p| state.tmdb.poster_url(p)),
            rating: movie
                .vote_average
                .filter(|r| *r > 0.0)
                .map(|r| format!("{:.1}", r)),
            id: movie.id,
        })
        .collect()
}

fn detail_view(state: &AppState, details: &MovieDetails) -> DetailView {
    DetailView {
        title: details.display_title().to_string(),
        poster_url: details
            .poster_path
            .as_deref()
            .map(|p| state.tmdb.poster_url(p)),
        release_year: details.release_year().unwrap_or("N/A").to_string(),
        genres: if details.genres.is_empty() {
            "N/A".to_string()
        } else {
            details
                .genres
                .iter()
                .map(|g| g.name.clone())
                .collect::<Vec<_>>()
                .join(", ")
        },
        rating: format_rating(details.vote_average, details.vote_count),
        runtime: format_runtime(details.runtime),
        tagline: details.tagline.clone().filter(|t| !t.is_empty()),
        overview: details
            .overview
            .clone()
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| "No overview available.".to_string()),
        homepage: details.homepage.clone().filter(|h| !h.is_empty()),
        imdb_url: details
            .imdb_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| format!("https://www.imdb.com/title/{}/", id)),
        director: details.director().map(|name| name.to_string()),
        cast: {
            let cast = details.top_cast(5);
            if cast.is_empty() {
                None
            } else {
                Some(cast.join(", "))
            }
        },
    }
}

// =============================================================================
// Browse page
// =============================================================================

/// GET / renders the browse page.
///
/// Renders the detail view while a movie is selected in the session,
/// otherwise the (possibly surprise) grid.
pub async fn browse(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<FilterParams>,
) -> Response {
    let (jar, session_id) = ensure_session(jar);
    let selection = params.selection();

    let genre_catalog = state.tmdb.genres().await;
    let moods = MoodCatalog::from_genres(&genre_catalog);
    let filters = sidebar_context(&selection, &genre_catalog, &moods);

    let mut notices = Vec::new();
    if genre_catalog.is_empty() {
        notices.push(Notice::warning(
            "Could not load movie genres from TMDB. Genre and mood filtering are disabled.",
        ));
    }

    let session = state.sessions.get(session_id);

    if let Some(movie_id) = session.selected_movie_id {
        let movie = state
            .tmdb
            .movie_details(movie_id)
            .await
            .map(|details| detail_view(&state, &details));
        if movie.is_none() {
            notices.push(Notice::error(
                "Sorry, could not load movie details. The movie might not exist or there \
                 was an API issue.",
            ));
        }
        let template = MovieDetailTemplate {
            movie,
            notices,
            filters,
        };
        return (jar, template).into_response();
    }

    if session.surprise_mode {
        return surprise_grid(state, jar, session_id, selection, filters, notices).await;
    }

    let mut query = discover::build_query(&selection, &genre_catalog, &moods);

    // Person filters, memoized per (role, name) in the session.
    let mut session = session;
    let actor_id =
        discover::resolve_person(&state.tmdb, &selection.actor_name, &mut session.actor).await;
    if !selection.actor_name.is_empty() && actor_id.is_none() {
        notices.push(Notice::warning(format!(
            "Actor '{}' not found.",
            selection.actor_name
        )));
    }
    let director_id =
        discover::resolve_person(&state.tmdb, &selection.director_name, &mut session.director)
            .await;
    if !selection.director_name.is_empty() && director_id.is_none() {
        notices.push(Notice::warning(format!(
            "Director '{}' not found.",
            selection.director_name
        )));
    }
    state.sessions.set(session_id, session.clone());

    let person_filter = discover::apply_person_filter(&mut query, actor_id, director_id);
    if matches!(person_filter, PersonFilter::ActorWins { .. }) {
        notices.push(Notice::info(format!(
            "Showing results for actor '{}'. Director filter ignored as actor filter is active.",
            selection.actor_name
        )));
    }

    let filters_active = discover::filters_applied(&query);

    let mut page = session.page;
    let (mut movies, total_pages) = state.tmdb.discover(&query, page).await;
    let max_display_page = discover::max_display_page(total_pages);
    if total_pages > 0 && page > max_display_page {
        // The API reports fewer pages than the stored one (filters changed);
        // clamp and refetch.
        let clamped = state
            .sessions
            .apply(session_id, Event::ClampPage { max_page: max_display_page });
        page = clamped.page;
        movies = state.tmdb.discover(&query, page).await.0;
    }

    let heading = if session.surprise_just_shown {
        "🎁 Surprise Movies!"
    } else if filters_active {
        "🍿 Recommended Movies"
    } else {
        "🔥 Popular Movies"
    };

    if movies.is_empty() {
        notices.push(Notice::info(
            "🤔 No movies found matching your current criteria. Try adjusting the filters \
             or use 'Surprise Me'!",
        ));
    }

    let show_pagination = !movies.is_empty() && max_display_page > 1;
    let template = BrowseTemplate {
        heading: heading.to_string(),
        notices,
        surprise_caption: None,
        movies: movie_cards(&state, movies),
        page,
        max_display_page,
        show_pagination,
        prev_disabled: page <= 1,
        next_disabled: page >= max_display_page,
        filters,
    };
    (jar, template).into_response()
}

/// Surprise flow: learn the pool depth, jump to a random page inside it and
/// commit that page into the session.
async fn surprise_grid(
    state: AppState,
    jar: CookieJar,
    session_id: Uuid,
    selection: FilterSelection,
    filters: SidebarContext,
    notices: Vec<Notice>,
) -> Response {
    let query = discover::surprise_query(selection.year_range);

    let (_, initial_total_pages) = state.tmdb.discover(&query, 1).await;
    let (page, max_page) = {
        let mut rng = rand::thread_rng();
        discover::pick_surprise_page(initial_total_pages, &mut rng)
    };

    let (movies, total_pages) = state.tmdb.discover(&query, page).await;
    state
        .sessions
        .apply(session_id, Event::SurpriseShown { page });

    let max_display_page = discover::max_display_page(total_pages);
    let show_pagination = !movies.is_empty() && max_display_page > 1;
    let template = BrowseTemplate {
        heading: "🎁 Surprise Movies!".to_string(),
        notices,
        surprise_caption: Some(format!(
            "(Showing random page {} of {} highly-rated movies)",
            page, max_page
        )),
        movies: movie_cards(&state, movies),
        page,
        max_display_page,
        show_pagination,
        prev_disabled: page <= 1,
        next_disabled: page >= max_display_page,
        filters,
    };
    (jar, template).into_response()
}

// =============================================================================
// Session transitions
// =============================================================================

/// Apply a session transition and bounce back to the browse page, keeping
/// the sidebar's filter state in the redirect target.
fn transition_redirect(
    state: &AppState,
    headers: &HeaderMap,
    jar: CookieJar,
    event: Event,
    params: &FilterParams,
) -> Response {
    let (jar, session_id) = ensure_session(jar);
    state.sessions.apply(session_id, event);

    let query_string = params.selection().to_query_string();
    let target = if query_string.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query_string)
    };

    if headers.is_htmx() {
        // HTMX request: return HX-Redirect header
        (
            jar,
            [(HeaderName::from_static("hx-redirect"), target)],
            StatusCode::OK,
        )
            .into_response()
    } else {
        (jar, Redirect::to(&target)).into_response()
    }
}

/// POST /movies/:id/select shows the detail view for a movie.
pub async fn select_movie(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(params): Form<FilterParams>,
) -> Response {
    transition_redirect(&state, &headers, jar, Event::Select(id), &params)
}

/// POST /back returns from the detail view to the grid.
pub async fn back(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(params): Form<FilterParams>,
) -> Response {
    transition_redirect(&state, &headers, jar, Event::Back, &params)
}

/// POST /page/next advances the grid one page.
pub async fn next_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(params): Form<FilterParams>,
) -> Response {
    transition_redirect(&state, &headers, jar, Event::NextPage, &params)
}

/// POST /page/prev goes back one page (no-op on page 1).
pub async fn previous_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(params): Form<FilterParams>,
) -> Response {
    transition_redirect(&state, &headers, jar, Event::PreviousPage, &params)
}

/// POST /surprise arms surprise mode; the next browse render does the
/// random jump.
pub async fn surprise(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(params): Form<FilterParams>,
) -> Response {
    transition_redirect(&state, &headers, jar, Event::TriggerSurprise, &params)
}

//! TMDB (The Movie Database) service client.
//!
//! Wraps the four upstream operations the app consumes: genre list, person
//! search, movie discovery and movie details. Every public operation degrades
//! remote failures (transport, non-2xx, malformed JSON) to an empty/None
//! sentinel and logs the cause; callers treat those sentinels as normal
//! outcomes and render a fallback, never an exception path.
//!
//! Responses are memoized for the process lifetime in a key→JSON cache, so
//! identical (operation, arguments) pairs issue at most one network call.
//! Catalog data changes slowly enough that staleness is acceptable.

use dashmap::DashMap;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::TmdbConfig;
use crate::error::{AppError, Result};

/// TMDB API client with process-lifetime response memoization.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    image_base_url: String,
    cache: DashMap<String, serde_json::Value>,
}

impl TmdbClient {
    /// Create a new TMDB client from configuration.
    ///
    /// Returns an error if the access token is missing/empty or the HTTP
    /// client cannot be built. URL and timeout come from the config so tests
    /// can point the client at a stub server.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let token = config.access_token.as_deref().unwrap_or("").trim();
        if token.is_empty() {
            return Err(AppError::InvalidConfig(
                "TMDB access token cannot be empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| AppError::InvalidConfig(format!("Invalid TMDB access token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            cache: DashMap::new(),
        })
    }

    /// Create a new TMDB client wrapped in Arc for shared access.
    pub fn new_shared(config: &TmdbConfig) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// Fetch the movie genre catalog as id→name.
    ///
    /// Returns an empty map on any failure; callers must treat an empty
    /// catalog as "genre filtering unavailable", not as a hard error.
    pub async fn genres(&self) -> HashMap<u32, String> {
        match self
            .get_json::<GenreListResponse>("/genre/movie/list", &[])
            .await
        {
            Ok(response) => response
                .genres
                .into_iter()
                .map(|g| (g.id, g.name))
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to load TMDB genres: {}", e);
                HashMap::new()
            }
        }
    }

    /// Resolve a person name to a TMDB person id.
    ///
    /// The first-ranked result in the API's own ordering is authoritative;
    /// no disambiguation among multiple matches is attempted. Returns None
    /// for an empty name, zero results, or any failure.
    pub async fn search_person(&self, name: &str) -> Option<u64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let params = [
            ("query".to_string(), name.to_string()),
            ("include_adult".to_string(), "false".to_string()),
        ];
        match self
            .get_json::<PersonSearchResponse>("/search/person", &params)
            .await
        {
            Ok(response) => match response.results.first() {
                Some(person) => Some(person.id),
                None => {
                    tracing::debug!(name = %name, "Person search returned no results");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(name = %name, "Person search failed: {}", e);
                None
            }
        }
    }

    /// Fetch one page of the discovery endpoint.
    ///
    /// The caller supplies the filter parameters; `include_adult=false`,
    /// `language=en-US` and the page number are always forced, and
    /// `sort_by=popularity.desc` is injected when the caller did not choose
    /// a sort. Returns `(vec![], 0)` on any failure.
    pub async fn discover(
        &self,
        params: &std::collections::BTreeMap<String, String>,
        page: u32,
    ) -> (Vec<MovieSummary>, u32) {
        let mut query: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !params.contains_key("sort_by") {
            query.push(("sort_by".to_string(), "popularity.desc".to_string()));
        }
        query.push(("include_adult".to_string(), "false".to_string()));
        query.push(("language".to_string(), "en-US".to_string()));
        query.push(("page".to_string(), page.to_string()));

        match self
            .get_json::<DiscoverResponse>("/discover/movie", &query)
            .await
        {
            Ok(response) => (response.results, response.total_pages),
            Err(e) => {
                tracing::warn!(page = page, "Movie discovery failed: {}", e);
                (Vec::new(), 0)
            }
        }
    }

    /// Fetch detailed information for a specific movie, credits included.
    ///
    /// Returns None when the movie does not exist or on any failure.
    pub async fn movie_details(&self, id: u64) -> Option<MovieDetails> {
        let params = [
            ("language".to_string(), "en-US".to_string()),
            ("append_to_response".to_string(), "credits".to_string()),
        ];
        match self
            .get_json::<MovieDetails>(&format!("/movie/{}", id), &params)
            .await
        {
            Ok(details) => Some(details),
            Err(AppError::NotFound(_)) => {
                tracing::debug!(movie_id = id, "Movie not found");
                None
            }
            Err(e) => {
                tracing::warn!(movie_id = id, "Failed to fetch movie details: {}", e);
                None
            }
        }
    }

    /// Full image URL for a poster path returned by the API.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }

    /// Number of memoized responses (test/diagnostic hook).
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    /// Internal helper: GET a path with query parameters, memoizing the
    /// decoded JSON body per (path, parameters).
    ///
    /// Callers build parameter lists deterministically, so the joined
    /// path+query string is a canonical cache key. Only successful responses
    /// are cached.
    async fn get_json<T>(&self, path: &str, params: &[(String, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let cache_key = Self::cache_key(path, params);
        if let Some(cached) = self.cache.get(&cache_key) {
            return serde_json::from_value(cached.clone()).map_err(|e| {
                AppError::Internal(format!("Failed to decode cached TMDB response: {}", e))
            });
        }

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "TMDB request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("TMDB request to {} failed: {}", path, e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Internal(
                "TMDB access token is invalid or expired".to_string(),
            ));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "TMDB resource not found: {}",
                path
            )));
        }

        if !status.is_success() {
            return Err(AppError::Internal(format!(
                "TMDB API {} returned error status: {}",
                path, status
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::Internal(format!("Failed to parse TMDB response from {}: {}", path, e))
        })?;

        let decoded = serde_json::from_value(body.clone()).map_err(|e| {
            AppError::Internal(format!("Unexpected TMDB response shape from {}: {}", path, e))
        })?;
        self.cache.insert(cache_key, body);
        Ok(decoded)
    }

    fn cache_key(path: &str, params: &[(String, String)]) -> String {
        let mut key = String::from(path);
        for (i, (k, v)) in params.iter().enumerate() {
            key.push(if i == 0 { '?' } else { '&' });
            key.push_str(k);
            key.push('=');
            key.push_str(v);
        }
        key
    }
}

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<GenreEntry>,
}

/// Genre entry from TMDB.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreEntry {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct PersonSearchResponse {
    #[serde(default)]
    results: Vec<PersonEntry>,
}

/// Person search result from TMDB.
#[derive(Debug, Deserialize)]
pub struct PersonEntry {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<MovieSummary>,
    #[serde(default)]
    total_pages: u32,
}

/// Movie summary from the discovery endpoint.
///
/// Every display field is optional; the API omits fields freely and the grid
/// must render whatever is present.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: Option<String>,
    /// Some discovery results carry `name` instead of `title`.
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
}

impl MovieSummary {
    /// Title with the API's `name` fallback.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("N/A")
    }
}

/// Detailed movie information, fetched with `append_to_response=credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub runtime: Option<u32>,
    pub release_date: Option<String>,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
    pub credits: Option<Credits>,
}

impl MovieDetails {
    /// Title with the API's `name` fallback.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("No Title Available")
    }

    /// Release year, when a parseable release date is present.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }

    /// The director's name from the crew credits, if known.
    pub fn director(&self) -> Option<&str> {
        self.credits.as_ref().and_then(|c| {
            c.crew
                .iter()
                .find(|member| member.job.as_deref() == Some("Director"))
                .map(|member| member.name.as_str())
        })
    }

    /// Top-billed cast names, in the API's billing order.
    pub fn top_cast(&self, limit: usize) -> Vec<&str> {
        self.credits
            .as_ref()
            .map(|c| c.cast.iter().take(limit).map(|m| m.name.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Credits block appended to movie details.
#[derive(Debug, Clone, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Cast credit.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
}

/// Crew credit.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: Option<String>,
}

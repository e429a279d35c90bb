//! Discovery query building.
//!
//! Pure translation of the sidebar's filter selections into TMDB
//! `/discover/movie` query parameters, plus the mood→genre catalog, the
//! actor/director resolution rules and the "surprise" query path. Everything
//! here except person resolution is a pure function over small in-memory
//! mappings.

use rand::Rng;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::services::tmdb::TmdbClient;
use crate::session::PersonLookup;

/// Year-range slider bounds.
pub const MIN_YEAR: u16 = 1900;
pub const MAX_YEAR: u16 = 2025;
pub const DEFAULT_YEAR_RANGE: (u16, u16) = (2000, 2025);
pub const DEFAULT_MIN_RATING: f64 = 6.0;

/// The discovery endpoint paginates reliably only this deep.
pub const MAX_API_PAGES: u32 = 500;

/// Sentinel option meaning "no genre restriction".
pub const ALL_SENTINEL: &str = "All";
/// Sentinel option meaning "no language restriction".
pub const ANY_LANGUAGE: &str = "Any";

/// Display name → ISO 639-1 code for the language filter.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Hindi", "hi"),
    ("Malayalam", "ml"),
    ("Tamil", "ta"),
    ("Telugu", "te"),
];

/// Mood preset → genre names it bundles. Names missing from the loaded
/// genre catalog are pruned when the catalog is built.
const MOOD_PRESETS: &[(&str, &[&str])] = &[
    ("Action-packed", &["Action", "Adventure", "Science Fiction"]),
    ("Exciting", &["Action", "Adventure", "Thriller", "Science Fiction"]),
    ("Funny", &["Comedy"]),
    ("Romantic", &["Romance", "Comedy"]),
    ("Suspenseful", &["Thriller", "Horror", "Mystery"]),
    ("Thought-provoking", &["Drama", "Mystery", "Science Fiction"]),
];

/// Mood presets resolved against the loaded genre catalog.
#[derive(Debug, Clone, Default)]
pub struct MoodCatalog {
    moods: BTreeMap<String, BTreeSet<u32>>,
}

impl MoodCatalog {
    /// Build the catalog by resolving each preset's genre names against the
    /// id→name genre map. Unavailable genre names are pruned; a preset that
    /// resolves to no ids at all is dropped from the catalog.
    pub fn from_genres(genres: &HashMap<u32, String>) -> Self {
        let by_name: HashMap<&str, u32> = genres.iter().map(|(id, name)| (name.as_str(), *id)).collect();

        let mut moods = BTreeMap::new();
        for (mood, genre_names) in MOOD_PRESETS {
            let ids: BTreeSet<u32> = genre_names
                .iter()
                .filter_map(|name| by_name.get(name).copied())
                .collect();
            if !ids.is_empty() {
                moods.insert(mood.to_string(), ids);
            }
        }
        Self { moods }
    }

    /// Genre ids for a mood, or None for unknown moods and the "All" sentinel.
    pub fn genre_ids(&self, mood: &str) -> Option<&BTreeSet<u32>> {
        self.moods.get(mood)
    }

    /// Mood names in display order.
    pub fn names(&self) -> Vec<String> {
        self.moods.keys().cloned().collect()
    }
}

/// The sidebar's filter selections, rebuilt from request parameters on every
/// render. Defaults mirror the UI's initial widget values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub year_range: (u16, u16),
    pub genres: Vec<String>,
    pub mood: String,
    pub min_rating: f64,
    pub languages: Vec<String>,
    pub actor_name: String,
    pub director_name: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            year_range: DEFAULT_YEAR_RANGE,
            genres: vec![ALL_SENTINEL.to_string()],
            mood: ALL_SENTINEL.to_string(),
            min_rating: DEFAULT_MIN_RATING,
            languages: vec![ANY_LANGUAGE.to_string()],
            actor_name: String::new(),
            director_name: String::new(),
        }
    }
}

impl FilterSelection {
    /// Serialize back into a URL query string, so transition handlers can
    /// redirect to the browse page without losing the sidebar state.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("year_from", self.year_range.0.to_string()),
            ("year_to", self.year_range.1.to_string()),
        ];
        for genre in &self.genres {
            pairs.push(("genre", genre.clone()));
        }
        pairs.push(("mood", self.mood.clone()));
        for language in &self.languages {
            pairs.push(("language", language.clone()));
        }
        if !self.actor_name.is_empty() {
            pairs.push(("actor", self.actor_name.clone()));
        }
        if !self.director_name.is_empty() {
            pairs.push(("director", self.director_name.clone()));
        }
        pairs.push(("min_rating", format!("{}", self.min_rating)));

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Build the base discovery query parameters from the filter selections.
///
/// Sets the release-date bounds unconditionally; genre, rating and language
/// filters only when active. Never sets `sort_by`; the client defaults the
/// sort when no caller chose one.
pub fn build_query(
    selection: &FilterSelection,
    genre_catalog: &HashMap<u32, String>,
    moods: &MoodCatalog,
) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();

    let (from, to) = selection.year_range;
    params.insert(
        "primary_release_date.gte".to_string(),
        format!("{}-01-01", from),
    );
    params.insert(
        "primary_release_date.lte".to_string(),
        format!("{}-12-31", to),
    );

    let mut genre_ids: BTreeSet<u32> = BTreeSet::new();
    if !genre_catalog.is_empty() {
        if !selection.genres.iter().any(|g| g == ALL_SENTINEL) {
            genre_ids.extend(
                genre_catalog
                    .iter()
                    .filter(|(_, name)| selection.genres.iter().any(|g| g == *name))
                    .map(|(id, _)| *id),
            );
        }
        if selection.mood != ALL_SENTINEL {
            if let Some(mood_ids) = moods.genre_ids(&selection.mood) {
                genre_ids.extend(mood_ids.iter().copied());
            }
        }
    }
    if !genre_ids.is_empty() {
        let joined = genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        params.insert("with_genres".to_string(), joined);
    }

    if selection.min_rating > 0.0 {
        params.insert(
            "vote_average.gte".to_string(),
            format!("{}", selection.min_rating),
        );
    }

    if !selection.languages.is_empty() && !selection.languages.iter().any(|l| l == ANY_LANGUAGE) {
        let codes: Vec<&str> = SUPPORTED_LANGUAGES
            .iter()
            .filter(|(name, _)| selection.languages.iter().any(|l| l == name))
            .map(|(_, code)| *code)
            .collect();
        if !codes.is_empty() {
            params.insert("with_original_language".to_string(), codes.join("|"));
        }
    }

    params
}

/// The query parameters for "surprise" mode: year range only, a popularity
/// sort and quality floors that keep obscure titles out of the pool.
pub fn surprise_query(year_range: (u16, u16)) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("sort_by".to_string(), "popularity.desc".to_string());
    params.insert("vote_average.gte".to_string(), "7".to_string());
    params.insert("vote_count.gte".to_string(), "300".to_string());
    params.insert(
        "primary_release_date.gte".to_string(),
        format!("{}-01-01", year_range.0),
    );
    params.insert(
        "primary_release_date.lte".to_string(),
        format!("{}-12-31", year_range.1),
    );
    params
}

/// The deepest page the UI will offer, never below 1.
pub fn max_display_page(total_pages: u32) -> u32 {
    total_pages.clamp(1, MAX_API_PAGES)
}

/// Pick a uniformly random page within the reliably-paginated pool.
/// Returns `(page, max_page)`.
pub fn pick_surprise_page<R: Rng>(total_pages: u32, rng: &mut R) -> (u32, u32) {
    let max_page = max_display_page(total_pages);
    let page = if max_page > 1 {
        rng.gen_range(1..=max_page)
    } else {
        1
    };
    (page, max_page)
}

/// How the person filters ended up applied to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonFilter {
    /// No person filter active.
    None,
    /// Only an actor filter.
    Actor(u64),
    /// Only a director filter.
    Director(u64),
    /// Both were resolved; the actor filter wins and the director filter is
    /// dropped, which the UI must announce.
    ActorWins { actor: u64, director: u64 },
}

/// Apply the actor/director precedence rule to a parameter map.
///
/// When both resolve, the cast filter (`with_people`) is used and any crew
/// filter is removed; a lone director becomes a `with_crew` filter.
pub fn apply_person_filter(
    params: &mut BTreeMap<String, String>,
    actor_id: Option<u64>,
    director_id: Option<u64>,
) -> PersonFilter {
    match (actor_id, director_id) {
        (Some(actor), Some(director)) => {
            params.insert("with_people".to_string(), actor.to_string());
            params.remove("with_crew");
            PersonFilter::ActorWins { actor, director }
        }
        (Some(actor), None) => {
            params.insert("with_people".to_string(), actor.to_string());
            PersonFilter::Actor(actor)
        }
        (None, Some(director)) => {
            params.insert("with_crew".to_string(), director.to_string());
            PersonFilter::Director(director)
        }
        (None, None) => PersonFilter::None,
    }
}

/// Whether any narrowing filter is active in a built query. Drives the
/// "Recommended" vs "Popular" heading; the year range alone does not count.
pub fn filters_applied(params: &BTreeMap<String, String>) -> bool {
    ["with_genres", "with_people", "with_crew", "vote_average.gte", "with_original_language"]
        .iter()
        .any(|key| params.contains_key(*key))
}

/// Resolve a person name to an id, memoized per role in session state.
///
/// A repeated name is served from the lookup without a network call, even
/// when the cached answer is "not found". An empty name clears the cached
/// entry. The caller persists the mutated lookup back into the session.
pub async fn resolve_person(
    client: &TmdbClient,
    name: &str,
    lookup: &mut PersonLookup,
) -> Option<u64> {
    let name = name.trim();
    if name.is_empty() {
        lookup.searched_name = None;
        lookup.resolved_id = None;
        return None;
    }

    if lookup.searched_name.as_deref() == Some(name) {
        return lookup.resolved_id;
    }

    let id = client.search_person(name).await;
    lookup.searched_name = Some(name.to_string());
    lookup.resolved_id = id;
    id
}

//! Per-session browsing state.
//!
//! Each browser session owns one `SessionState`: the current grid page, the
//! selected movie (detail view toggle), the memoized actor/director lookups
//! and the surprise-mode flags. Transitions are pure functions so the state
//! machine is deterministic to test; the store owns the actual mutation and
//! is keyed by a session cookie. Nothing here is persisted across restarts.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "atlas_session";

/// Memoized person-name resolution for one role (actor or director).
///
/// `searched_name` is the cache key; `resolved_id == None` with a present
/// name means "searched and not found", which is served from cache too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonLookup {
    pub searched_name: Option<String>,
    pub resolved_id: Option<u64>,
}

/// One browser session's state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Current grid page, always >= 1.
    pub page: u32,
    /// Selected movie; Some means the detail view is shown and the grid and
    /// pagination are suppressed.
    pub selected_movie_id: Option<u64>,
    pub actor: PersonLookup,
    pub director: PersonLookup,
    /// Armed by the surprise button; consumed by the next render pass.
    pub surprise_mode: bool,
    /// Set once the surprise page has been committed, so the next render can
    /// label the grid accordingly.
    pub surprise_just_shown: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            page: 1,
            selected_movie_id: None,
            actor: PersonLookup::default(),
            director: PersonLookup::default(),
            surprise_mode: false,
            surprise_just_shown: false,
        }
    }
}

/// Session transitions. `NextPage` has no upper bound here; the views
/// disable the control at the last display page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Select(u64),
    Back,
    NextPage,
    PreviousPage,
    TriggerSurprise,
    /// Render-pass commit after a surprise fetch: stores the randomly chosen
    /// page and flips the flags.
    SurpriseShown { page: u32 },
    /// Clamp the stored page when the API reports fewer pages than it.
    ClampPage { max_page: u32 },
}

impl SessionState {
    /// Apply a transition, producing the next state.
    pub fn apply(&self, event: Event) -> SessionState {
        let mut next = self.clone();
        match event {
            Event::Select(movie_id) => {
                next.selected_movie_id = Some(movie_id);
                next.surprise_just_shown = false;
            }
            Event::Back => {
                next.selected_movie_id = None;
            }
            Event::NextPage => {
                next.page += 1;
                next.surprise_just_shown = false;
            }
            Event::PreviousPage => {
                if next.page > 1 {
                    next.page -= 1;
                }
                next.surprise_just_shown = false;
            }
            Event::TriggerSurprise => {
                next.surprise_mode = true;
                next.page = 1;
                next.selected_movie_id = None;
                next.surprise_just_shown = false;
            }
            Event::SurpriseShown { page } => {
                next.page = page.max(1);
                next.surprise_mode = false;
                next.surprise_just_shown = true;
            }
            Event::ClampPage { max_page } => {
                next.page = next.page.min(max_page.max(1));
            }
        }
        next
    }

    /// Whether the session is in the detail view.
    pub fn in_detail(&self) -> bool {
        self.selected_movie_id.is_some()
    }
}

/// In-memory session store keyed by the session cookie's id.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a session, default-initialized on first access.
    pub fn get(&self, id: Uuid) -> SessionState {
        self.sessions.entry(id).or_default().clone()
    }

    /// Replace a session's state wholesale (used after render-pass mutations
    /// such as person-lookup memoization).
    pub fn set(&self, id: Uuid, state: SessionState) {
        self.sessions.insert(id, state);
    }

    /// Apply a transition and return the resulting state.
    pub fn apply(&self, id: Uuid, event: Event) -> SessionState {
        let mut entry = self.sessions.entry(id).or_default();
        let next = entry.apply(event);
        *entry = next.clone();
        next
    }

    /// Number of live sessions (test/diagnostic hook).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Read the session id from the cookie jar, minting a new id and cookie when
/// absent or unparseable. Returns the (possibly updated) jar and the id.
pub fn ensure_session(jar: CookieJar) -> (CookieJar, Uuid) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        return (jar, id);
    }

    let id = Uuid::new_v4();
    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

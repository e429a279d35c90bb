//! Content negotiation helpers.
//!
//! The transition handlers answer both HTMX requests (HX-Redirect header)
//! and plain form posts (HTTP redirect); these helpers keep that distinction
//! in one place.

use axum::http::{header::ACCEPT, HeaderMap};

/// Check if the request prefers HTML based on the Accept header.
///
/// Returns true if:
/// - Request has "HX-Request" header (HTMX request)
/// - Accept header contains "text/html"
pub fn prefers_html(headers: &HeaderMap) -> bool {
    // HTMX always wants HTML
    if headers.contains_key("hx-request") {
        return true;
    }

    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

/// Extension trait for HeaderMap to check content preferences.
pub trait ContentNegotiation {
    fn prefers_html(&self) -> bool;
    fn is_htmx(&self) -> bool;
}

impl ContentNegotiation for HeaderMap {
    fn prefers_html(&self) -> bool {
        prefers_html(self)
    }

    fn is_htmx(&self) -> bool {
        self.contains_key("hx-request")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_htmx_header_prefers_html() {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(headers.prefers_html());
        assert!(headers.is_htmx());
    }

    #[test]
    fn test_accept_html() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,*/*"));
        assert!(headers.prefers_html());
        assert!(!headers.is_htmx());
    }

    #[test]
    fn test_json_client() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!headers.prefers_html());
    }
}

//! Security response headers.
//!
//! # Responsibilities
//! - Stamp the fixed security header set on every served response
//!
//! # Design Decisions
//! - Headers are set, not appended, so applying twice leaves one copy
//! - Never applied to 404 responses

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Content-Security-Policy for the drill's single-page app.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
    style-src 'self' 'unsafe-inline'; \
    img-src 'self' data: https:; \
    media-src 'self' data:; \
    connect-src 'self' https:; \
    font-src 'self' data:;";

/// Header names and values applied to every served response.
pub const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-xss-protection", "1; mode=block"),
    ("permissions-policy", "microphone=(self)"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
];

/// Set the security header set on `headers`, replacing any existing values.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// True when every security header is present exactly once.
pub fn has_security_headers(headers: &HeaderMap) -> bool {
    SECURITY_HEADERS
        .iter()
        .all(|(name, value)| {
            let mut values = headers.get_all(*name).iter();
            values.next().is_some_and(|v| v == *value) && values.next().is_none()
        })
}

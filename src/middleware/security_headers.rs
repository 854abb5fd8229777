//! Security and caching headers for the two kinds of responses this service produces:
//! JSON API bodies (never cached) and stored images (cached for a day).

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::{AppConfig, SecurityConfig};

const STATIC_HEADERS: [(&str, &str); 5] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
    ("cross-origin-resource-policy", "same-origin"),
];

const IMAGE_MAX_AGE: &str = "public, max-age=86400";

/// Adds the static security headers, optional HSTS/CSP from `[security]`, and the cache policy
/// matching the response content type.
pub async fn security_headers_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    for (name, value) in STATIC_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    if let Some(sec) = cfg.security.as_ref() {
        apply_configured(headers, sec);
    }
    apply_cache_policy(headers);

    res
}

fn apply_configured(headers: &mut HeaderMap, sec: &SecurityConfig) {
    if sec.enable_hsts.unwrap_or(false) {
        let max_age = sec.hsts_max_age.unwrap_or(31_536_000);
        let include_sub = if sec.hsts_include_subdomains.unwrap_or(false) { "; includeSubDomains" } else { "" };
        if let Ok(value) = HeaderValue::from_str(&format!("max-age={}{}", max_age, include_sub)) {
            headers.insert(HeaderName::from_static("strict-transport-security"), value);
        }
    }
    if let Some(csp) = sec.csp.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        match HeaderValue::from_str(csp) {
            Ok(value) => {
                headers.insert(HeaderName::from_static("content-security-policy"), value);
            }
            Err(e) => tracing::warn!("Ignoring invalid security.csp: {}", e),
        }
    }
}

fn apply_cache_policy(headers: &mut HeaderMap) {
    let content_type = headers.get(CONTENT_TYPE).and_then(|ct| ct.to_str().ok()).unwrap_or("").to_string();
    if content_type.starts_with("application/json") {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    } else if content_type.starts_with("image/") {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(IMAGE_MAX_AGE));
        headers.remove(PRAGMA);
    }
}

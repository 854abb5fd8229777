use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// An Axum middleware that rejects request URIs containing path traversal sequences.
///
/// Library names, document ids and image filenames travel in the URI and end up joined onto
/// filesystem paths, so traversal attempts are cut off before routing. Suspicious user agents
/// are only logged.
pub async fn validate_request_middleware(req: Request, next: Next) -> Response {
    let uri = req.uri();
    let traversal = contains_path_traversal(uri.path()) || uri.query().map(query_contains_traversal).unwrap_or(false);
    if traversal {
        tracing::warn!("Path traversal rejected: {}", sanitize_for_logging(&uri.to_string()));
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": "INVALID_PATH",
                    "message": "Path traversal detected in request",
                },
                "status": 400,
            })),
        )
            .into_response();
    }

    if let Some(user_agent) = req.headers().get("user-agent") {
        if let Ok(ua_str) = user_agent.to_str() {
            if is_suspicious_user_agent(ua_str) {
                tracing::warn!("Suspicious user agent detected: {}", sanitize_for_logging(ua_str));
            }
        }
    }

    next.run(req).await
}

/// Checks a request path for `.`/`..` segments, plain and percent-encoded.
///
/// Only whole segments count, so file names like `..draft.png` or `wait....png` pass.
/// Encoded separators and NUL are rejected outright.
pub fn contains_path_traversal(path: &str) -> bool {
    has_forbidden_bytes(path) || path.split(['/', '\\']).any(is_dot_segment)
}

/// Same check for a query string, applied to every parameter value.
pub fn query_contains_traversal(query: &str) -> bool {
    has_forbidden_bytes(query)
        || query
            .split('&')
            .filter_map(|pair| pair.split_once('=').map(|(_, value)| value))
            .any(|value| value.split(['/', '\\']).any(is_dot_segment))
}

fn has_forbidden_bytes(input: &str) -> bool {
    let lower = input.to_lowercase();
    input.contains('\0') || ["%00", "%2f", "%5c", "%252f", "%255c"].iter().any(|p| lower.contains(p))
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_lowercase().replace("%252e", ".").replace("%2e", ".");
    decoded == "." || decoded == ".."
}

fn is_suspicious_user_agent(ua: &str) -> bool {
    let ua_lower = ua.to_lowercase();
    ua_lower.contains("scanner")
        || (ua_lower.contains("crawler") && !ua_lower.contains("googlebot") && !ua_lower.contains("bingbot"))
        || ua_lower.contains("nikto")
        || ua_lower.contains("sqlmap")
        || ua_lower.contains("havij")
        || ua_lower.contains("acunetix")
}

/// Sanitizes user input for logging purposes.
///
/// Removes control characters (except whitespace), limits the length to 200 characters and
/// escapes backslashes and quotes.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\\'")
}

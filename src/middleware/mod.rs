//! Middleware components for HTTP request processing.
//!
//! - `security_headers`: security and caching headers on every response
//! - `validation`: rejects path traversal in request URIs before routing

pub mod security_headers;
pub mod validation;

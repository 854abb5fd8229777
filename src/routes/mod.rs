//! HTTP route handlers for the Dokuwald API.
//!
//! - `documents`: document create/read/update and reparenting
//! - `health`: health, readiness, metrics and version endpoints
//! - `images`: image upload and download per document
//! - `libraries`: library provisioning, listing and per-library config

pub mod documents;
pub mod health;
pub mod images;
pub mod libraries;

use axum::{
    extract::{DefaultBodyLimit, FromRequest},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::{
    error::{
        validation::{require_field, validate_path_segment},
        AppError, AppResult,
    },
    middleware,
    state::AppState,
};

/// Global request body limit; uploads get `storage.max_upload_bytes` instead.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Builds the application router with all API and operational routes plus the request
/// validation and security-header middleware.
pub fn router(state: AppState) -> Router {
    let upload_limit = state.config.storage.max_upload_bytes;
    let cfg_arc = state.config.clone();

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/api/document", post(documents::create_document).get(documents::get_document))
        .route("/api/document/create", post(documents::create_document))
        .route("/api/document/tree", get(documents::get_document_tree))
        .route("/api/document/update-parent", post(documents::update_document_parent))
        .route("/api/document/update", post(documents::update_document))
        .route(
            "/api/upload/{id}",
            post(images::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/pic/{library}/{docid}/{filename}", get(images::get_image))
        .route("/api/library/create", post(libraries::create_library))
        .route("/api/library/list", get(libraries::list_libraries))
        .route("/api/library/config", get(libraries::get_config).post(libraries::set_config))
        .with_state(state)
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(from_fn(middleware::validation::validate_request_middleware))
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware))
}

/// `Json` extractor whose rejections are reported as [`AppError::BadRequest`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// The `library` query parameter, required and limited to a single path component.
pub(crate) fn library_param(library: Option<&str>) -> AppResult<&str> {
    let library = require_field(library, "library")?;
    validate_path_segment(library, "library")
}

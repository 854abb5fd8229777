use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: the document root must be an accessible directory
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let check = tokio::fs::metadata(state.libraries.root().to_path_buf());
    match tokio::time::timeout(std::time::Duration::from_secs(5), check).await {
        Ok(Ok(meta)) if meta.is_dir() => (StatusCode::OK, "ready").into_response(),
        Ok(Ok(_)) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: document root is not a directory").into_response(),
        Ok(Err(e)) => (StatusCode::SERVICE_UNAVAILABLE, format!("not ready: {}", e)).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP dokuwald_libraries_created Total libraries provisioned\n# TYPE dokuwald_libraries_created counter\ndokuwald_libraries_created {}\n\
# HELP dokuwald_documents_created Total documents created\n# TYPE dokuwald_documents_created counter\ndokuwald_documents_created {}\n\
# HELP dokuwald_documents_updated Total document updates that changed a row\n# TYPE dokuwald_documents_updated counter\ndokuwald_documents_updated {}\n\
# HELP dokuwald_images_uploaded Images stored\n# TYPE dokuwald_images_uploaded counter\ndokuwald_images_uploaded {}\n\
# HELP dokuwald_images_served Images served\n# TYPE dokuwald_images_served counter\ndokuwald_images_served {}\n\
# HELP dokuwald_config_writes Library config upserts\n# TYPE dokuwald_config_writes counter\ndokuwald_config_writes {}\n\
# HELP dokuwald_uptime_seconds Uptime seconds\n# TYPE dokuwald_uptime_seconds gauge\ndokuwald_uptime_seconds {}\n",
        m.libraries_created,
        m.documents_created,
        m.documents_updated,
        m.images_uploaded,
        m.images_served,
        m.config_writes,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}

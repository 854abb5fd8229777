use axum::{
    body::Body,
    extract::{Multipart, Path, Query, Request, State},
    response::{IntoResponse, Response},
    Json,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{
    error::{AppError, AppResult},
    images,
    routes::library_param,
    state::AppState,
    types::{LibraryQuery, UploadResponse},
};

/// Multipart upload; the image is expected in form field `file`.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    Query(query): Query<LibraryQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let library = library_param(query.library.as_deref())?;

    let mut upload: Option<(Option<String>, Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(|n| n.to_string());
        let content_type = field.content_type().map(|c| c.to_string());
        let data = field.bytes().await?;
        upload = Some((filename, content_type, data.to_vec()));
        break;
    }
    let (filename, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file is received".to_string()))?;

    let stored = images::upload_image(
        &state.libraries,
        library,
        &document_id,
        filename.as_deref(),
        content_type.as_deref(),
        &data,
    )
    .await?;
    state.metrics.inc_images_uploaded();

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        path: stored.path,
        filename: stored.filename,
    }))
}

/// Streams a stored image; the content type follows the file extension.
pub async fn get_image(
    State(state): State<AppState>,
    Path((library, document_id, filename)): Path<(String, String, String)>,
    req: Request,
) -> AppResult<Response> {
    let path = images::resolve_image(&state.libraries, &library, &document_id, &filename).await?;

    let res = match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res,
        Err(never) => match never {},
    };
    state.metrics.inc_images_served();
    Ok(res.map(Body::new).into_response())
}

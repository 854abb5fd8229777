//! Filesystem image storage under `<root>/<library>/pic/<document_id>/<filename>`.
//!
//! Images are only ever created. A name that is already taken gets a numeric suffix
//! (`a.png`, `a_1.png`, `a_2.png`, ...) instead of being overwritten.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::{
    db::{LibraryStore, IMAGE_DIR},
    error::{validation::validate_path_segment, AppError, AppResult},
    middleware::validation::sanitize_for_logging,
    types::StoredImage,
};

/// Stores an uploaded image for `document_id` and returns the final filename plus the URL path
/// it is served under.
///
/// Without a usable filename, a millisecond timestamp plus an extension derived from
/// `content_type` is used.
pub async fn upload_image(
    store: &LibraryStore,
    library: &str,
    document_id: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
) -> AppResult<StoredImage> {
    let library = validate_path_segment(library, "library")?;
    let document_id = validate_path_segment(document_id, "id")?;

    let target_dir = image_dir(store, library, document_id);
    tokio::fs::create_dir_all(&target_dir).await?;

    let requested = filename
        .and_then(sanitize_filename)
        .unwrap_or_else(|| generated_filename(content_type));
    let filename = write_unique(&target_dir, &requested, data).await?;

    info!(
        "Stored image '{}' ({} bytes) for document {} in library '{}'",
        sanitize_for_logging(&filename),
        data.len(),
        sanitize_for_logging(document_id),
        sanitize_for_logging(library)
    );

    let path = format!("/api/pic/{}/{}/{}", library, document_id, filename);
    Ok(StoredImage { filename, path })
}

/// Resolves the on-disk path of a stored image.
///
/// Empty components are `BadRequest`, anything that is not a single path component is a
/// validation error, and a missing file is `NotFound`.
pub async fn resolve_image(store: &LibraryStore, library: &str, document_id: &str, filename: &str) -> AppResult<PathBuf> {
    if library.is_empty() || document_id.is_empty() || filename.is_empty() {
        return Err(AppError::BadRequest("Library, document ID, and filename are required".to_string()));
    }
    let library = validate_path_segment(library, "library")?;
    let document_id = validate_path_segment(document_id, "docid")?;
    let filename = validate_path_segment(filename, "filename")?;

    let path = image_dir(store, library, document_id).join(filename);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(AppError::NotFound("Image not found".to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound("Image not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

pub fn image_dir(store: &LibraryStore, library: &str, document_id: &str) -> PathBuf {
    store.library_dir(library).join(IMAGE_DIR).join(document_id)
}

/// Strips any directory components from a client-supplied filename.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return None;
    }
    Some(base.to_string())
}

pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let ct = content_type.unwrap_or("").to_ascii_lowercase();
    if ct.contains("jpeg") || ct.contains("jpg") {
        ".jpg"
    } else if ct.contains("gif") {
        ".gif"
    } else {
        // png and everything unrecognized
        ".png"
    }
}

pub fn generated_filename(content_type: Option<&str>) -> String {
    format!("{}{}", Utc::now().timestamp_millis(), extension_for_content_type(content_type))
}

/// Splits `name` into stem and extension (extension includes the dot, may be empty).
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// `attempt == 0` is the name itself, then `<stem>_<attempt><ext>`.
pub fn candidate_name(name: &str, attempt: u64) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    format!("{}_{}{}", stem, attempt, ext)
}

// create_new makes the existence check and the create a single step
async fn write_unique(dir: &Path, name: &str, data: &[u8]) -> AppResult<String> {
    let mut attempt = 0u64;
    loop {
        let candidate = candidate_name(name, attempt);
        let path = dir.join(&candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                if let Err(e) = write_all(&mut file, data).await {
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(e.into());
                }
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("Image name {} taken, trying next suffix", sanitize_for_logging(&candidate));
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}

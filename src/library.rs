//! Library provisioning and discovery.
//!
//! A library is a directory holding exactly one `blog.db` and a `pic/` image tree. Libraries are
//! provisioned once and never updated in place or deleted.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use sqlx::SqliteConnection;
use tokio::task::spawn_blocking;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    db::{self, LibraryStore, DATABASE_FILE, IMAGE_DIR},
    error::{validation::validate_path_segment, AppError, AppResult},
    library_config::{self, BLOG_NAMESPACE, NAME_KEY},
    middleware::validation::sanitize_for_logging,
    types::LibraryInfo,
};

/// Directory a new library is provisioned in.
///
/// An explicit `base_path` is used as-is; otherwise the library lands in `<doc_root>/<name>`,
/// which requires `name` to be a single path component.
pub fn provisioning_path(store: &LibraryStore, name: &str, base_path: &str) -> AppResult<PathBuf> {
    let base_path = base_path.trim();
    if !base_path.is_empty() {
        return Ok(PathBuf::from(base_path));
    }
    let name = validate_path_segment(name.trim(), "name")?;
    Ok(store.library_dir(name))
}

/// Provisions a library in `base_path`: `pic/` directory, `blog.db` with both tables and the
/// seed config row `("blog", "name", name)`.
///
/// Fails with `Conflict` when `base_path/blog.db` already exists. An existing directory
/// without a database is reused.
pub async fn create_library(store: &LibraryStore, name: &str, base_path: &Path) -> AppResult<LibraryInfo> {
    let db_path = base_path.join(DATABASE_FILE);
    if tokio::fs::try_exists(&db_path).await? {
        return Err(AppError::Conflict(format!("Library already exists at {}", base_path.display())));
    }

    tokio::fs::create_dir_all(base_path.join(IMAGE_DIR)).await?;

    let mut conn = db::open_database(&db_path, true, store.busy_timeout()).await?;
    let result = provision(&mut conn, name).await;
    db::release(conn).await;
    result?;

    info!("Created library '{}' at {}", sanitize_for_logging(name), base_path.display());

    Ok(LibraryInfo { name: name.to_string(), path: base_path.to_string_lossy().into_owned(), dir: None })
}

async fn provision(conn: &mut SqliteConnection, name: &str) -> AppResult<()> {
    db::init_library_schema(conn).await?;
    sqlx::query("INSERT INTO config (name, key, value) VALUES (?1, ?2, ?3)")
        .bind(BLOG_NAMESPACE)
        .bind(NAME_KEY)
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Lists the libraries directly below the document root.
///
/// Creates the root (and returns an empty list) if it does not exist. Only immediate
/// subdirectories that contain a `blog.db` count; their display name is the `blog/name` config
/// value, falling back to the directory name. Order is directory-listing order.
pub async fn list_libraries(store: &LibraryStore) -> AppResult<Vec<LibraryInfo>> {
    let root = store.root().to_path_buf();
    if !tokio::fs::try_exists(&root).await? {
        tokio::fs::create_dir_all(&root).await?;
        return Ok(Vec::new());
    }

    let candidates = spawn_blocking(move || scan_library_dirs(&root))
        .await
        .map_err(|e| AppError::Internal(anyhow!("library scan task join error: {}", e)))??;

    let mut libraries = Vec::with_capacity(candidates.len());
    for (dir_name, lib_path) in candidates {
        let name = read_library_name(&lib_path.join(DATABASE_FILE), store)
            .await
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| dir_name.clone());
        libraries.push(LibraryInfo { name, path: lib_path.to_string_lossy().into_owned(), dir: Some(dir_name) });
    }
    Ok(libraries)
}

// Non-recursive: only direct children of the root
fn scan_library_dirs(root: &Path) -> AppResult<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let lib_path = entry.path().to_path_buf();
        if lib_path.join(DATABASE_FILE).exists() {
            found.push((entry.file_name().to_string_lossy().into_owned(), lib_path));
        }
    }
    Ok(found)
}

async fn read_library_name(db_path: &Path, store: &LibraryStore) -> Option<String> {
    let mut conn = match db::open_database(db_path, false, store.busy_timeout()).await {
        Ok(conn) => conn,
        Err(e) => {
            debug!("Cannot open {}: {}", db_path.display(), e);
            return None;
        }
    };
    let name = library_config::get_value(&mut conn, BLOG_NAMESPACE, NAME_KEY).await;
    db::release(conn).await;
    match name {
        Ok(name) => name,
        Err(e) => {
            debug!("Cannot read library name from {}: {}", db_path.display(), e);
            None
        }
    }
}

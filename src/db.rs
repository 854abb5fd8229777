use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, Connection, SqliteConnection};

use crate::error::{AppError, AppResult};

/// Name of the database file inside every library directory.
pub const DATABASE_FILE: &str = "blog.db";
/// Name of the image directory inside every library directory.
pub const IMAGE_DIR: &str = "pic";

/// Joins `<root>/<library>/blog.db`. No existence check.
pub fn resolve_database_path(root: &Path, library: &str) -> PathBuf {
    root.join(library).join(DATABASE_FILE)
}

/// Connection provider for per-library databases.
///
/// There is no pool and no shared handle: every operation opens its own connection to the
/// library's database file and closes it again on every exit path. Concurrent access to the
/// same file is serialized by SQLite's file locking (plus `busy_timeout`).
#[derive(Debug, Clone)]
pub struct LibraryStore {
    root: PathBuf,
    busy_timeout: Duration,
}

impl LibraryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), busy_timeout: Duration::from_millis(10_000) }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    pub fn library_dir(&self, library: &str) -> PathBuf {
        self.root.join(library)
    }

    pub fn database_path(&self, library: &str) -> PathBuf {
        resolve_database_path(&self.root, library)
    }

    /// Opens a connection to an existing library database.
    ///
    /// The database file is never created here; a missing file is `NotFound`.
    pub async fn connect(&self, library: &str) -> AppResult<SqliteConnection> {
        let path = self.database_path(library);
        if !tokio::fs::try_exists(&path).await? {
            return Err(AppError::NotFound("Library not found".to_string()));
        }
        open_database(&path, false, self.busy_timeout).await
    }
}

pub async fn open_database(path: &Path, create: bool, busy_timeout: Duration) -> AppResult<SqliteConnection> {
    let conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .busy_timeout(busy_timeout)
        .connect()
        .await?;
    Ok(conn)
}

/// Closes a connection obtained from [`LibraryStore::connect`] or [`open_database`].
///
/// Callers release on the error path too: `let r = op(&mut conn).await; release(conn).await; r`.
pub async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close library connection: {}", e);
    }
}

/// Creates the `documents` and `config` tables if they are absent.
pub async fn init_library_schema(conn: &mut SqliteConnection) -> AppResult<()> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            content TEXT,
            parent_id INTEGER
        )"#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS config (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            key TEXT,
            value TEXT
        )"#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn table_exists(conn: &mut SqliteConnection, table: &str) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
        .bind(table)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

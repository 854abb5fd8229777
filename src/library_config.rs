//! Per-library key/value settings stored in the `config` table.

use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use tracing::debug;

use crate::{
    db::{self, LibraryStore},
    error::{AppError, AppResult},
    types::ConfigMap,
};

pub const BLOG_NAMESPACE: &str = "blog";
pub const NAME_KEY: &str = "name";

/// All config rows of a library grouped by namespace. Unreadable rows are skipped.
pub async fn get_config(store: &LibraryStore, library: &str) -> AppResult<ConfigMap> {
    let mut conn = store.connect(library).await?;
    let result = fetch_all(&mut conn).await;
    db::release(conn).await;
    result
}

/// Upserts `(name, key) = value`. Returns whether a row was written.
///
/// Check-then-write over two statements; concurrent writers of the same key race.
pub async fn set_config(store: &LibraryStore, library: &str, name: &str, key: &str, value: &str) -> AppResult<bool> {
    if name.is_empty() || key.is_empty() {
        return Err(AppError::InvalidInput("Name and key are required".to_string()));
    }
    let mut conn = store.connect(library).await?;
    let result = upsert(&mut conn, name, key, value).await;
    db::release(conn).await;
    result
}

pub async fn fetch_all(conn: &mut SqliteConnection) -> AppResult<ConfigMap> {
    let rows = sqlx::query("SELECT id, name, key, value FROM config").fetch_all(&mut *conn).await?;

    let mut config = ConfigMap::new();
    for row in rows {
        match decode_row(&row) {
            Ok((name, key, value)) => {
                config.entry(name).or_default().insert(key, value);
            }
            Err(e) => debug!("Skipping unreadable config row: {}", e),
        }
    }
    Ok(config)
}

fn decode_row(row: &SqliteRow) -> Result<(String, String, String), sqlx::Error> {
    Ok((row.try_get("name")?, row.try_get("key")?, row.try_get("value")?))
}

pub async fn get_value(conn: &mut SqliteConnection, name: &str, key: &str) -> AppResult<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM config WHERE name = ?1 AND key = ?2 LIMIT 1")
            .bind(name)
            .bind(key)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(value.flatten())
}

pub async fn upsert(conn: &mut SqliteConnection, name: &str, key: &str, value: &str) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM config WHERE name = ?1 AND key = ?2")
        .bind(name)
        .bind(key)
        .fetch_one(&mut *conn)
        .await?;

    let result = if count > 0 {
        sqlx::query("UPDATE config SET value = ?1 WHERE name = ?2 AND key = ?3")
            .bind(value)
            .bind(name)
            .bind(key)
            .execute(&mut *conn)
            .await?
    } else {
        sqlx::query("INSERT INTO config (name, key, value) VALUES (?1, ?2, ?3)")
            .bind(name)
            .bind(key)
            .bind(value)
            .execute(&mut *conn)
            .await?
    };

    Ok(result.rows_affected() > 0)
}

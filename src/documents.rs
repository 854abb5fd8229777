//! Document repository for the `documents` table of one library.
//!
//! Documents form a forest through `parent_id` (`0` means no parent). The hierarchy is never
//! materialized here; clients rebuild it from the flat list.

use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection};
use tracing::debug;

use crate::{
    db::{self, LibraryStore},
    error::{validation::validate_positive_id, AppError, AppResult, OptionExt},
    types::Document,
};

/// Inserts a document and returns its auto-assigned id. `parent_id` is not checked.
pub async fn create_document(
    store: &LibraryStore,
    library: &str,
    title: &str,
    content: &str,
    parent_id: i64,
) -> AppResult<i64> {
    let mut conn = store.connect(library).await?;
    let result = insert(&mut conn, title, content, parent_id).await;
    db::release(conn).await;
    result
}

/// All documents of the library, flat. A library without a `documents` table yields an empty list.
pub async fn list_document_tree(store: &LibraryStore, library: &str) -> AppResult<Vec<Document>> {
    let mut conn = store.connect(library).await?;
    let result = fetch_all(&mut conn).await;
    db::release(conn).await;
    result
}

/// Fetches one document. A missing table, a missing row and an unparsable id are all `NotFound`.
pub async fn get_document(store: &LibraryStore, library: &str, id: &str) -> AppResult<Document> {
    let mut conn = store.connect(library).await?;
    let result = fetch_one(&mut conn, id).await;
    db::release(conn).await;
    result
}

/// Moves a document below `parent_id`.
///
/// Only direct self-parenting is refused. Moving a document below one of its own descendants
/// is accepted and produces a cycle; an unknown `id` updates nothing and is not an error.
pub async fn update_document_parent(store: &LibraryStore, library: &str, id: i64, parent_id: i64) -> AppResult<()> {
    if id == parent_id {
        return Err(AppError::InvalidOperation("A document cannot be moved under itself".to_string()));
    }
    let mut conn = store.connect(library).await?;
    let result = set_parent(&mut conn, id, parent_id).await;
    db::release(conn).await;
    result
}

/// Partial update of title and/or content. Returns whether a row was changed.
///
/// Empty or blank values count as "not supplied", so a field can never be set to `""` here.
pub async fn update_document(
    store: &LibraryStore,
    library: &str,
    id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> AppResult<bool> {
    let id = validate_positive_id(id, "id")?;
    let mut conn = store.connect(library).await?;
    let result = update_fields(&mut conn, id, title, content).await;
    db::release(conn).await;
    result
}

pub async fn insert(conn: &mut SqliteConnection, title: &str, content: &str, parent_id: i64) -> AppResult<i64> {
    let res = sqlx::query("INSERT INTO documents (title, content, parent_id) VALUES (?1, ?2, ?3)")
        .bind(title)
        .bind(content)
        .bind(parent_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.last_insert_rowid())
}

pub async fn fetch_all(conn: &mut SqliteConnection) -> AppResult<Vec<Document>> {
    if !db::table_exists(conn, "documents").await? {
        return Ok(Vec::new());
    }

    let rows = sqlx::query("SELECT id, title, content, parent_id FROM documents")
        .fetch_all(&mut *conn)
        .await?;

    let mut docs = Vec::with_capacity(rows.len());
    for row in rows {
        match decode_row(&row) {
            Ok(doc) => docs.push(doc),
            // Rows that do not decode (e.g. NULL columns) are left out of the listing
            Err(e) => debug!("Skipping unreadable document row: {}", e),
        }
    }
    Ok(docs)
}

pub async fn fetch_one(conn: &mut SqliteConnection, id: &str) -> AppResult<Document> {
    if !db::table_exists(conn, "documents").await? {
        return Err(AppError::NotFound("Document not found".to_string()));
    }
    let Ok(id) = id.trim().parse::<i64>() else {
        return Err(AppError::NotFound("Document not found".to_string()));
    };

    let row = sqlx::query("SELECT id, title, content, parent_id FROM documents WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_not_found("Document")?;

    Ok(decode_row(&row)?)
}

pub async fn set_parent(conn: &mut SqliteConnection, id: i64, parent_id: i64) -> AppResult<()> {
    let res = sqlx::query("UPDATE documents SET parent_id = ?1 WHERE id = ?2")
        .bind(parent_id)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if res.rows_affected() == 0 {
        debug!("Reparenting unknown document {} was a no-op", id);
    }
    Ok(())
}

pub async fn update_fields(
    conn: &mut SqliteConnection,
    id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> AppResult<bool> {
    let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM documents WHERE id = ?1)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if exists == 0 {
        return Err(AppError::NotFound("Document not found".to_string()));
    }

    let title = title.filter(|t| !t.trim().is_empty());
    let content = content.filter(|c| !c.trim().is_empty());
    if title.is_none() && content.is_none() {
        return Err(AppError::InvalidInput("No fields to update".to_string()));
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE documents SET ");
    {
        let mut fields = qb.separated(", ");
        if let Some(title) = title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(content) = content {
            fields.push("content = ").push_bind_unseparated(content);
        }
    }
    qb.push(" WHERE id = ").push_bind(id);

    let res = qb.build().execute(&mut *conn).await?;
    Ok(res.rows_affected() > 0)
}

fn decode_row(row: &SqliteRow) -> Result<Document, sqlx::Error> {
    Ok(Document {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        parent_id: row.try_get("parent_id")?,
    })
}

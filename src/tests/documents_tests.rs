#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::db::{self, LibraryStore};
    use crate::documents::{
        create_document, get_document, list_document_tree, update_document, update_document_parent,
    };
    use crate::error::AppError;
    use crate::tests::provisioned_store;
    use crate::types::{Document, NO_PARENT};

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        let id = create_document(&store, "L", "Title", "Some *markdown*", NO_PARENT).await.unwrap();
        let doc = get_document(&store, "L", &id.to_string()).await.unwrap();

        assert_eq!(
            doc,
            Document { id, title: "Title".to_string(), content: "Some *markdown*".to_string(), parent_id: NO_PARENT }
        );
    }

    #[tokio::test]
    async fn test_parent_id_is_not_validated_on_create() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        let id = create_document(&store, "L", "orphan", "", 999).await.unwrap();
        let doc = get_document(&store, "L", &id.to_string()).await.unwrap();
        assert_eq!(doc.parent_id, 999);
    }

    #[tokio::test]
    async fn test_tree_of_fresh_library_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        let docs = list_document_tree(&store, "L").await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_library_without_documents_table() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path());
        let lib_dir = dir.path().join("bare");
        std::fs::create_dir_all(&lib_dir).unwrap();
        let mut conn = db::open_database(&lib_dir.join("blog.db"), true, store.busy_timeout()).await.unwrap();
        sqlx::query("CREATE TABLE unrelated (x INTEGER)").execute(&mut conn).await.unwrap();
        db::release(conn).await;

        let docs = list_document_tree(&store, "bare").await.unwrap();
        assert!(docs.is_empty());

        let missing = get_document(&store, "bare", "1").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_library_is_not_found_and_not_created() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path());

        let res = list_document_tree(&store, "ghost").await;
        assert!(matches!(res, Err(AppError::NotFound(_))));
        assert!(!store.database_path("ghost").exists());
    }

    #[tokio::test]
    async fn test_get_document_not_found_cases() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;
        create_document(&store, "L", "A", "x", NO_PARENT).await.unwrap();

        for id in ["42", "abc", "1.5", ""] {
            let res = get_document(&store, "L", id).await;
            assert!(matches!(res, Err(AppError::NotFound(_))), "id {:?} should be not found", id);
        }
    }

    #[tokio::test]
    async fn test_tree_skips_unreadable_rows() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;
        create_document(&store, "L", "good", "x", NO_PARENT).await.unwrap();

        let mut conn = store.connect("L").await.unwrap();
        sqlx::query("INSERT INTO documents (title, content, parent_id) VALUES (NULL, 'y', 0)")
            .execute(&mut conn)
            .await
            .unwrap();
        db::release(conn).await;

        let docs = list_document_tree(&store, "L").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "good");
    }

    #[tokio::test]
    async fn test_self_parent_is_rejected_even_without_library() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path());

        let res = update_document_parent(&store, "does-not-exist", 5, 5).await;
        assert!(matches!(res, Err(AppError::InvalidOperation(_))));

        let store = provisioned_store(dir.path(), "L").await;
        let res = update_document_parent(&store, "L", 5, 5).await;
        assert!(matches!(res, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn test_reparent_unknown_document_is_silent_noop() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;
        let id = create_document(&store, "L", "A", "x", NO_PARENT).await.unwrap();

        update_document_parent(&store, "L", 77, id).await.unwrap();

        let docs = list_document_tree(&store, "L").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].parent_id, NO_PARENT);
    }

    #[tokio::test]
    async fn test_tree_scenario_allows_transitive_cycle() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path());
        crate::library::create_library(&store, "L", &dir.path().join("L")).await.unwrap();

        let a = create_document(&store, "L", "A", "x", NO_PARENT).await.unwrap();
        assert_eq!(a, 1);
        let b = create_document(&store, "L", "B", "y", a).await.unwrap();
        assert_eq!(b, 2);

        let mut docs = list_document_tree(&store, "L").await.unwrap();
        docs.sort_by_key(|d| d.id);
        assert_eq!(docs.len(), 2);
        assert_eq!((docs[0].id, docs[0].parent_id), (1, NO_PARENT));
        assert_eq!((docs[1].id, docs[1].parent_id), (2, 1));

        // Only direct self-parenting is checked; this forms a 1 <-> 2 cycle
        update_document_parent(&store, "L", 1, 2).await.unwrap();
        update_document_parent(&store, "L", 2, 1).await.unwrap();

        let mut docs = list_document_tree(&store, "L").await.unwrap();
        docs.sort_by_key(|d| d.id);
        assert_eq!(docs[0].parent_id, 2);
        assert_eq!(docs[1].parent_id, 1);
    }

    #[tokio::test]
    async fn test_update_document_partial() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;
        let id = create_document(&store, "L", "old title", "old content", NO_PARENT).await.unwrap();

        let updated = update_document(&store, "L", id, Some("new title"), None).await.unwrap();
        assert!(updated);
        let doc = get_document(&store, "L", &id.to_string()).await.unwrap();
        assert_eq!(doc.title, "new title");
        assert_eq!(doc.content, "old content");

        // Empty title counts as absent
        let updated = update_document(&store, "L", id, Some(""), Some("new content")).await.unwrap();
        assert!(updated);
        let doc = get_document(&store, "L", &id.to_string()).await.unwrap();
        assert_eq!(doc.title, "new title");
        assert_eq!(doc.content, "new content");
    }

    #[tokio::test]
    async fn test_update_document_errors() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;
        let id = create_document(&store, "L", "t", "c", NO_PARENT).await.unwrap();

        let res = update_document(&store, "L", id, Some(""), Some("   ")).await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));
        let res = update_document(&store, "L", id, None, None).await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));

        let res = update_document(&store, "L", 0, Some("x"), None).await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));
        let res = update_document(&store, "L", -3, Some("x"), None).await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));

        // Existence is checked before the field check
        let res = update_document(&store, "L", id + 100, None, None).await;
        assert!(matches!(res, Err(AppError::NotFound(_))));

        let doc = get_document(&store, "L", &id.to_string()).await.unwrap();
        assert_eq!((doc.title.as_str(), doc.content.as_str()), ("t", "c"));
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::db::{self, LibraryStore};
    use crate::error::AppError;
    use crate::library_config::{get_config, set_config};
    use crate::tests::provisioned_store;

    #[tokio::test]
    async fn test_seeded_blog_name() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "mybook").await;

        let config = get_config(&store, "mybook").await.unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config["blog"]["name"], "mybook");
    }

    #[tokio::test]
    async fn test_set_config_upserts() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        assert!(set_config(&store, "L", "theme", "color", "blue").await.unwrap());
        assert!(set_config(&store, "L", "theme", "color", "green").await.unwrap());
        assert!(set_config(&store, "L", "blog", "name", "Renamed").await.unwrap());

        let config = get_config(&store, "L").await.unwrap();
        assert_eq!(config["theme"].len(), 1);
        assert_eq!(config["theme"]["color"], "green");
        assert_eq!(config["blog"]["name"], "Renamed");

        let mut conn = store.connect("L").await.unwrap();
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM config").fetch_one(&mut conn).await.unwrap();
        db::release(conn).await;
        assert_eq!(rows, 2);
    }

    #[tokio::test]
    async fn test_set_config_allows_empty_value() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        set_config(&store, "L", "blog", "subtitle", "").await.unwrap();
        let config = get_config(&store, "L").await.unwrap();
        assert_eq!(config["blog"]["subtitle"], "");
    }

    #[tokio::test]
    async fn test_set_config_requires_name_and_key() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        let res = set_config(&store, "L", "", "k", "v").await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));
        let res = set_config(&store, "L", "n", "", "v").await;
        assert!(matches!(res, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_get_config_skips_unreadable_rows() {
        let dir = TempDir::new().unwrap();
        let store = provisioned_store(dir.path(), "L").await;

        let mut conn = store.connect("L").await.unwrap();
        sqlx::query("INSERT INTO config (name, key, value) VALUES ('blog', 'broken', NULL)")
            .execute(&mut conn)
            .await
            .unwrap();
        db::release(conn).await;

        let config = get_config(&store, "L").await.unwrap();
        assert!(!config["blog"].contains_key("broken"));
        assert_eq!(config["blog"]["name"], "L");
    }

    #[tokio::test]
    async fn test_config_of_missing_library() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path());
        let res = get_config(&store, "nope").await;
        assert!(matches!(res, Err(AppError::NotFound(_))));
    }
}

//! In-crate tests for the Dokuwald backend.
//!
//! ## Test Modules
//!
//! - **library_tests**: Library provisioning and discovery
//! - **documents_tests**: Document repository, including the reparenting rules
//! - **config_store_tests**: Per-library key/value settings
//! - **images_tests**: Image storage and naming
//! - **api_tests**: HTTP endpoints driven through the router
//! - **error_tests**: Error mapping and validation helpers
//! - **config_tests**: Application configuration loading and validation
//! - **health_api_tests**: Health, readiness, metrics and version endpoints
//!
//! Run a single module with `cargo test documents_tests`.

pub mod config_store_tests;
pub mod documents_tests;
pub mod error_tests;

use std::path::Path;

use crate::{config::AppConfig, db::LibraryStore, library};

/// Default configuration rooted at `root`.
pub(crate) fn test_config(root: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.doc_root = root.to_path_buf();
    cfg
}

/// Provisions `<root>/<name>` and returns the store.
pub(crate) async fn provisioned_store(root: &Path, name: &str) -> LibraryStore {
    let store = LibraryStore::new(root);
    let path = store.library_dir(name);
    library::create_library(&store, name, &path).await.unwrap();
    store
}

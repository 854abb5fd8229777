use std::{sync::Arc, time::Duration};

use crate::config::AppConfig;
use crate::db::LibraryStore;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Holds no database handle: per-library connections are opened per request through
/// [`LibraryStore`]. Cheap to clone for Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Connection provider rooted at the configured document root.
    pub libraries: LibraryStore,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The application metrics.
    pub metrics: Metrics,
}

impl AppState {
    /// Creates the state for `config`, rooting the library store at `storage.doc_root`.
    pub fn new(config: AppConfig) -> Self {
        let libraries = LibraryStore::new(config.storage.doc_root.clone())
            .with_busy_timeout(Duration::from_millis(config.storage.busy_timeout_ms));

        Self { libraries, config: Arc::new(config), metrics: Metrics::new() }
    }
}

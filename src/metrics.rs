use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Operation counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub libraries_created: Arc<AtomicU64>,
    pub documents_created: Arc<AtomicU64>,
    pub documents_updated: Arc<AtomicU64>,
    pub images_uploaded: Arc<AtomicU64>,
    pub images_served: Arc<AtomicU64>,
    pub config_writes: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            libraries_created: Arc::new(AtomicU64::new(0)),
            documents_created: Arc::new(AtomicU64::new(0)),
            documents_updated: Arc::new(AtomicU64::new(0)),
            images_uploaded: Arc::new(AtomicU64::new(0)),
            images_served: Arc::new(AtomicU64::new(0)),
            config_writes: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_libraries_created(&self) {
        self.libraries_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_documents_created(&self) {
        self.documents_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_documents_updated(&self) {
        self.documents_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_images_uploaded(&self) {
        self.images_uploaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_images_served(&self) {
        self.images_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_config_writes(&self) {
        self.config_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            libraries_created: self.libraries_created.load(Ordering::Relaxed),
            documents_created: self.documents_created.load(Ordering::Relaxed),
            documents_updated: self.documents_updated.load(Ordering::Relaxed),
            images_uploaded: self.images_uploaded.load(Ordering::Relaxed),
            images_served: self.images_served.load(Ordering::Relaxed),
            config_writes: self.config_writes.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub libraries_created: u64,
    pub documents_created: u64,
    pub documents_updated: u64,
    pub images_uploaded: u64,
    pub images_served: u64,
    pub config_writes: u64,
    pub uptime_seconds: u64,
}

//! # Dokuwald Backend Library
//!
//! Dokuwald organizes documents into libraries. Every library is a directory with its own
//! SQLite database (`blog.db`) and an image tree (`pic/<document_id>/<filename>`). Documents
//! form a forest through their `parent_id`, each library carries namespaced key/value settings,
//! and everything is exposed through a small JSON REST API.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server and routing
//! - **SQLx**: SQLite access, one connection per request and library (no pool)
//! - **Tokio**: Async runtime and filesystem I/O
//! - **Serde**: Serialization/deserialization for JSON APIs
//!
//! ## Core Components
//!
//! - [`config`]: Application configuration (files, environment, command-line flags)
//! - [`db`]: Per-library connection provider and schema creation
//! - [`library`]: Library provisioning and discovery
//! - [`documents`]: Document repository (tree via `parent_id`)
//! - [`library_config`]: Per-library namespaced settings
//! - [`images`]: Image storage with collision-free naming
//! - [`error`]: Centralized error handling and HTTP error responses
//! - [`metrics`]: Operation counters
//! - [`middleware`]: Request validation and security headers
//! - [`routes`]: HTTP API endpoint handlers
//! - [`state`]: Shared application state
//! - [`types`]: Data transfer objects and shared type definitions

pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod images;
pub mod library;
pub mod library_config;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

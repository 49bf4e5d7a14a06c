use std::sync::Arc;

use citadel_core::cover::CoverCompositor;
use citadel_source::CatalogSource;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: citadel_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Cover renderer; shared read-only by the blocking pool.
    pub compositor: Arc<CoverCompositor>,
    /// Upstream catalog for admin-triggered imports.
    pub source: Arc<dyn CatalogSource>,
}

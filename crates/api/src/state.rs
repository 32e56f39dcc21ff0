use std::sync::Arc;

use melodia_storage::AssetStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: melodia_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Backend for uploaded images, chosen at startup.
    pub assets: Arc<dyn AssetStore>,
}

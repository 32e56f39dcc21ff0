//! Health endpoint for the catalog service.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the catalog database answered `SELECT 1`.
    pub db_healthy: bool,
}

/// GET /health
///
/// Always answers 200 so load balancers can tell a running process with a
/// lost database apart from a dead one.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = melodia_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Catalog database is unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`, always served with `200`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Result of a `SELECT 1` against the pool.
    pub db_healthy: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = vlab_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("database unreachable; reporting degraded");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// `/health` lives outside `/api/v1` and needs no token.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

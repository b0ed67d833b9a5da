use allowance_db::SchemaStatus;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers and every migration is applied.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// `None` when the migration table cannot be read.
    pub schema: Option<SchemaReport>,
}

#[derive(Serialize)]
pub struct SchemaReport {
    pub applied_migrations: usize,
    pub pending_migrations: usize,
    pub latest_version: Option<i64>,
}

impl From<SchemaStatus> for SchemaReport {
    fn from(status: SchemaStatus) -> Self {
        Self {
            applied_migrations: status.applied,
            pending_migrations: status.pending,
            latest_version: status.latest_version,
        }
    }
}

/// GET /health -- database reachability and migration state.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = allowance_db::health_check(&state.pool).await.is_ok();
    let schema = match allowance_db::schema_status(&state.pool).await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read migration state");
            None
        }
    };

    let current = schema.as_ref().is_some_and(SchemaStatus::is_current);
    let status = if db_healthy && current { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema: schema.map(SchemaReport::from),
    })
}

/// Mount health check routes (root level, not under `/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

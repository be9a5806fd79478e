//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
    pub database: bool,
    /// Every embedded migration has been applied.
    pub schema_current: bool,
}

/// `200` when the database answers with a current schema, `503` otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, ApiJson<HealthStatus>) {
    let database = state.db.health_check().await;
    let schema_current = database
        && matches!(state.db.migration_status().await, Ok((total, applied)) if total == applied);

    let (code, status) = if database && schema_current {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        ApiJson(HealthStatus {
            status,
            service: state.config.app_name.clone(),
            database,
            schema_current,
        }),
    )
}

//! Health check

use axum::{extract::State, Json};
use roster_core::Error;

use crate::api::{error::ApiResult, models::HealthResponse, AppState};

/// GET /health
///
/// 200 when the store answers, 503 `UNAVAILABLE` otherwise.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.engine.health().await.map_err(|e| match e {
        Error::Unavailable(_) => e,
        other => Error::Unavailable(other.to_string()),
    })?;
    Ok(Json(HealthResponse { status: "healthy" }))
}

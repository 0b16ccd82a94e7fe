//! Team endpoints

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use roster_core::Team;

use crate::api::{
    error::ApiResult,
    models::{DeactivateTeamRequest, DeactivateTeamResponse, TeamNameQuery, TeamResponse},
    AppState,
};

/// POST /team/add
pub async fn add_team(
    State(state): State<AppState>,
    payload: Result<Json<Team>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    let Json(team) = payload?;
    let team = state.engine.create_team(team).await?;
    Ok((StatusCode::CREATED, Json(TeamResponse { team })))
}

/// GET /team/get?team_name=
pub async fn get_team(
    State(state): State<AppState>,
    query: Result<Query<TeamNameQuery>, QueryRejection>,
) -> ApiResult<Json<Team>> {
    let Query(query) = query?;
    let team = state.engine.get_team(&query.team_name).await?;
    Ok(Json(team))
}

/// POST /team/deactivate
pub async fn deactivate_team(
    State(state): State<AppState>,
    payload: Result<Json<DeactivateTeamRequest>, JsonRejection>,
) -> ApiResult<Json<DeactivateTeamResponse>> {
    let Json(req) = payload?;
    let deactivated_count = state.engine.deactivate_team(&req.team_name).await?;
    Ok(Json(DeactivateTeamResponse {
        message: format!("team {} deactivated", req.team_name),
        deactivated_count,
    }))
}

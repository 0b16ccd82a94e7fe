//! Pull request endpoints

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::api::{
    error::ApiResult,
    models::{
        CreatePullRequestRequest, MergePullRequestRequest, PullRequestResponse, ReassignRequest,
        ReassignResponse,
    },
    AppState,
};

/// POST /pullRequest/create
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PullRequestResponse>)> {
    let Json(req) = payload?;
    let pr = state
        .engine
        .create_pull_request(&req.pull_request_id, &req.pull_request_name, &req.author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(PullRequestResponse { pr })))
}

/// POST /pullRequest/merge
pub async fn merge(
    State(state): State<AppState>,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> ApiResult<Json<PullRequestResponse>> {
    let Json(req) = payload?;
    let pr = state.engine.merge_pull_request(&req.pull_request_id).await?;
    Ok(Json(PullRequestResponse { pr }))
}

/// POST /pullRequest/reassign
pub async fn reassign(
    State(state): State<AppState>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> ApiResult<Json<ReassignResponse>> {
    let Json(req) = payload?;
    let (pr, replaced_by) = state
        .engine
        .reassign_reviewer(&req.pull_request_id, &req.old_reviewer_id)
        .await?;
    Ok(Json(ReassignResponse { pr, replaced_by }))
}

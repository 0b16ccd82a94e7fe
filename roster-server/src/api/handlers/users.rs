//! User endpoints

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};

use crate::api::{
    error::ApiResult,
    models::{ReviewsResponse, SetIsActiveRequest, UserIdQuery, UserResponse},
    AppState,
};

/// POST /users/setIsActive
pub async fn set_is_active(
    State(state): State<AppState>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(req) = payload?;
    let user = state.engine.set_user_active(&req.user_id, req.is_active).await?;
    Ok(Json(UserResponse { user }))
}

/// GET /users/getReview?user_id=
///
/// Unknown users simply have nothing to review.
pub async fn get_review(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> ApiResult<Json<ReviewsResponse>> {
    let Query(query) = query?;
    let pull_requests = state.engine.reviews_for(&query.user_id).await?;
    Ok(Json(ReviewsResponse {
        user_id: query.user_id,
        pull_requests,
    }))
}

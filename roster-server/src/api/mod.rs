//! HTTP API: routes, handlers and error rendering

pub mod error;
pub mod handlers;
pub mod models;

use axum::{
    routing::{get, post},
    Router,
};
use roster_core::ReviewEngine;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: ReviewEngine,
}

/// Build the service router around an engine
pub fn router(engine: ReviewEngine) -> Router {
    Router::new()
        .route("/team/add", post(handlers::teams::add_team))
        .route("/team/get", get(handlers::teams::get_team))
        .route("/team/deactivate", post(handlers::teams::deactivate_team))
        .route("/users/setIsActive", post(handlers::users::set_is_active))
        .route("/users/getReview", get(handlers::users::get_review))
        .route("/pullRequest/create", post(handlers::pull_requests::create))
        .route("/pullRequest/merge", post(handlers::pull_requests::merge))
        .route("/pullRequest/reassign", post(handlers::pull_requests::reassign))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}

//! API error type and its HTTP rendering
//!
//! Every failure leaves the service as `{"error": {"code", "message"}}`.
//! System failures are logged here and reported with a generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::Error;
use serde::Serialize;
use tracing::error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Wrapper turning engine errors into responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0.code() {
            "INVALID_REQUEST" | "TEAM_EXISTS" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "PR_EXISTS" | "PR_MERGED" | "NOT_ASSIGNED" | "NO_CANDIDATE" | "CONFLICT" => {
                StatusCode::CONFLICT
            }
            "UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            Error::Unavailable(_) => "service unavailable".to_string(),
            e if e.is_internal() => "internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::InvalidRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.0.is_internal() {
            error!(code = self.0.code(), error = %self.0, "Request failed");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.0.code(),
                message: self.message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::Entity;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (Error::already_exists(Entity::Team, "t"), StatusCode::BAD_REQUEST),
            (Error::not_found(Entity::User, "u"), StatusCode::NOT_FOUND),
            (Error::already_exists(Entity::PullRequest, "p"), StatusCode::CONFLICT),
            (Error::AlreadyMerged("p".into()), StatusCode::CONFLICT),
            (Error::NoAvailableReviewers("p".into()), StatusCode::CONFLICT),
            (Error::Conflict("p".into()), StatusCode::CONFLICT),
            (Error::Unavailable("db".into()), StatusCode::SERVICE_UNAVAILABLE),
            (Error::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = ApiError(Error::Internal("disk full at /var/lib".into()));
        assert_eq!(err.message(), "internal server error");

        let err = ApiError(Error::not_found(Entity::Team, "core"));
        assert_eq!(err.message(), "team core not found");
    }
}

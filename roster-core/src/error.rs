//! Error types for Roster

use std::fmt;

use thiserror::Error;

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of record an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Team,
    User,
    PullRequest,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Team => "team",
            Entity::User => "user",
            Entity::PullRequest => "pull request",
        };
        f.write_str(name)
    }
}

/// Error type for Roster operations
#[derive(Error, Debug)]
pub enum Error {
    /// The referenced record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    /// A record with this key already exists
    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: Entity, id: String },

    /// Reassignment attempted on a merged pull request
    #[error("pull request {0} is already merged")]
    AlreadyMerged(String),

    /// The reviewer being replaced is not assigned to the pull request
    #[error("reviewer {reviewer_id} is not assigned to pull request {pull_request_id}")]
    ReviewerNotAssigned {
        pull_request_id: String,
        reviewer_id: String,
    },

    /// No active teammate is left to take over a review
    #[error("no available reviewers for pull request {0}")]
    NoAvailableReviewers(String),

    /// Malformed or missing request fields
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The record changed between read and conditional write
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other persistence failure
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn already_exists(entity: Entity, id: impl Into<String>) -> Self {
        Error::AlreadyExists {
            entity,
            id: id.into(),
        }
    }

    /// Stable wire code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NOT_FOUND",
            Error::AlreadyExists {
                entity: Entity::PullRequest,
                ..
            } => "PR_EXISTS",
            Error::AlreadyExists { .. } => "TEAM_EXISTS",
            Error::AlreadyMerged(_) => "PR_MERGED",
            Error::ReviewerNotAssigned { .. } => "NOT_ASSIGNED",
            Error::NoAvailableReviewers(_) => "NO_CANDIDATE",
            Error::InvalidRequest(_) => "INVALID_REQUEST",
            Error::Conflict(_) => "CONFLICT",
            Error::Unavailable(_) => "UNAVAILABLE",
            Error::Internal(_) | Error::Config(_) | Error::Io(_) => "INTERNAL",
        }
    }

    /// Whether this error reflects a failure of the system rather than of the request
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Unavailable(_) | Error::Internal(_) | Error::Config(_) | Error::Io(_)
        )
    }
}

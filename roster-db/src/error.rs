//! Error types for database operations

use roster_core::Entity;
use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum Error {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema bootstrap error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data that cannot be mapped back into the domain model
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Not found error
    #[error("Not found: {0} {1}")]
    NotFound(Entity, String),

    /// Unique constraint hit on insert
    #[error("Duplicate {0}: {1}")]
    Duplicate(Entity, String),

    /// Conditional update matched no row
    #[error("Stale write: {0}")]
    Stale(String),
}

impl Error {
    /// Map a unique-constraint violation to `Duplicate`, passing anything else through
    pub(crate) fn on_unique(err: sqlx::Error, entity: Entity, id: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Duplicate(entity, id.to_string())
            }
            _ => Error::Sqlx(err),
        }
    }

    /// Map `RowNotFound` to `NotFound`, passing anything else through
    pub(crate) fn on_missing(err: sqlx::Error, entity: Entity, id: &str) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound(entity, id.to_string()),
            e => Error::Sqlx(e),
        }
    }
}

impl From<Error> for roster_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(entity, id) => roster_core::Error::NotFound { entity, id },
            Error::Duplicate(entity, id) => roster_core::Error::AlreadyExists { entity, id },
            Error::Stale(msg) => roster_core::Error::Conflict(msg),
            Error::Sqlx(
                e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
            ) => roster_core::Error::Unavailable(e.to_string()),
            other => roster_core::Error::Internal(other.to_string()),
        }
    }
}

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, Error>;

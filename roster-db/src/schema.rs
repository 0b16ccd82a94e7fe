//! Row types as stored in SQLite

use chrono::{DateTime, Utc};
use roster_core::{PrStatus, PullRequest, User};

use crate::error::{Error, Result};

/// Row of the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            team_name: row.team_name,
            is_active: row.is_active,
        }
    }
}

/// Row of the `pull_requests` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PullRequestRow {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: String,
    pub assigned_reviewers: String, // JSON array
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub version: i64,
}

impl TryFrom<PullRequestRow> for PullRequest {
    type Error = Error;

    fn try_from(row: PullRequestRow) -> Result<Self> {
        let status: PrStatus = row
            .status
            .parse()
            .map_err(|_| Error::InvalidData(format!("unknown status {}", row.status)))?;
        let assigned_reviewers: Vec<String> = serde_json::from_str(&row.assigned_reviewers)?;

        Ok(Self {
            pull_request_id: row.pull_request_id,
            pull_request_name: row.pull_request_name,
            author_id: row.author_id,
            status,
            assigned_reviewers,
            created_at: row.created_at,
            merged_at: row.merged_at,
            version: row.version,
        })
    }
}

/// Columns selected for a pull request row
pub(crate) const PULL_REQUEST_COLUMNS: &str = "pull_request_id, pull_request_name, author_id, \
     status, assigned_reviewers, created_at, merged_at, version";

//! Pull request repository
//!
//! Reviewer lists are stored as a JSON array column and searched with
//! `json_each`. Updates are conditional on the `version` column.

use roster_core::{Entity, PullRequest};
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::schema::{PullRequestRow, PULL_REQUEST_COLUMNS};

/// Repository for pull request records
pub struct PullRequestRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PullRequestRepository<'a> {
    /// Create a new pull request repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, pull_request_id: &str) -> Result<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM pull_requests WHERE pull_request_id = ?")
                .bind(pull_request_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Insert a new pull request; the primary key decides duplicates
    pub async fn insert(&self, pr: &PullRequest) -> Result<()> {
        let reviewers_json = serde_json::to_string(&pr.assigned_reviewers)?;

        sqlx::query(
            r#"
            INSERT INTO pull_requests (
                pull_request_id, pull_request_name, author_id, status,
                assigned_reviewers, created_at, merged_at, version
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pr.pull_request_id)
        .bind(&pr.pull_request_name)
        .bind(&pr.author_id)
        .bind(pr.status.as_str())
        .bind(&reviewers_json)
        .bind(pr.created_at)
        .bind(pr.merged_at)
        .bind(pr.version)
        .execute(self.pool)
        .await
        .map_err(|e| Error::on_unique(e, Entity::PullRequest, &pr.pull_request_id))?;

        Ok(())
    }

    pub async fn get(&self, pull_request_id: &str) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(&format!(
            "SELECT {PULL_REQUEST_COLUMNS} FROM pull_requests WHERE pull_request_id = ?"
        ))
        .bind(pull_request_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| Error::on_missing(e, Entity::PullRequest, pull_request_id))?;

        row.try_into()
    }

    /// Write status, reviewers and merge time if the stored version still matches
    pub async fn update(&self, pr: &PullRequest) -> Result<PullRequest> {
        let reviewers_json = serde_json::to_string(&pr.assigned_reviewers)?;

        let result = sqlx::query(
            r#"
            UPDATE pull_requests
            SET status = ?, assigned_reviewers = ?, merged_at = ?, version = version + 1
            WHERE pull_request_id = ? AND version = ?
            "#,
        )
        .bind(pr.status.as_str())
        .bind(&reviewers_json)
        .bind(pr.merged_at)
        .bind(&pr.pull_request_id)
        .bind(pr.version)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either gone or changed underneath us
            if !self.exists(&pr.pull_request_id).await? {
                return Err(Error::NotFound(
                    Entity::PullRequest,
                    pr.pull_request_id.clone(),
                ));
            }
            return Err(Error::Stale(format!(
                "pull request {} was modified concurrently",
                pr.pull_request_id
            )));
        }

        let mut updated = pr.clone();
        updated.version += 1;
        Ok(updated)
    }

    /// Pull requests that list `user_id` among their reviewers, oldest first
    pub async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>> {
        let rows = sqlx::query_as::<_, PullRequestRow>(&format!(
            r#"
            SELECT {PULL_REQUEST_COLUMNS} FROM pull_requests
            WHERE EXISTS (
                SELECT 1 FROM json_each(pull_requests.assigned_reviewers)
                WHERE json_each.value = ?
            )
            ORDER BY created_at, pull_request_id
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PullRequest::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DatabaseConfig};
    use crate::repos::TeamRepository;
    use chrono::{Duration, Utc};
    use roster_core::{PrStatus, Team, TeamMember};
    use tempfile::TempDir;

    async fn setup_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Database::connect(DatabaseConfig::new(&db_path)).await.unwrap();
        db.migrate().await.unwrap();

        let team = Team::new(
            "core",
            ["a", "b", "c", "d"]
                .iter()
                .map(|id| TeamMember::new(*id, id.to_uppercase(), true))
                .collect(),
        );
        TeamRepository::new(db.pool()).create(&team).await.unwrap();
        (db, temp_dir)
    }

    fn open_pr(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
        PullRequest::open(
            id,
            format!("Change {id}"),
            author,
            reviewers.iter().map(|r| r.to_string()).collect(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, _temp) = setup_test_db().await;
        let repo = PullRequestRepository::new(db.pool());

        let pr = open_pr("pr-1", "a", &["c", "b"]);
        repo.insert(&pr).await.unwrap();
        assert!(repo.exists("pr-1").await.unwrap());

        let fetched = repo.get("pr-1").await.unwrap();
        assert_eq!(fetched, pr);
        assert_eq!(fetched.assigned_reviewers, vec!["c", "b"]);

        assert!(matches!(
            repo.get("pr-2").await,
            Err(Error::NotFound(Entity::PullRequest, _))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_insert() {
        let (db, _temp) = setup_test_db().await;
        let repo = PullRequestRepository::new(db.pool());

        repo.insert(&open_pr("pr-1", "a", &["b"])).await.unwrap();
        let err = repo.insert(&open_pr("pr-1", "c", &[])).await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(Entity::PullRequest, _)));
        assert_eq!(repo.get("pr-1").await.unwrap().author_id, "a");
    }

    #[tokio::test]
    async fn test_conditional_update() {
        let (db, _temp) = setup_test_db().await;
        let repo = PullRequestRepository::new(db.pool());
        repo.insert(&open_pr("pr-1", "a", &["b", "c"])).await.unwrap();

        let mut first = repo.get("pr-1").await.unwrap();
        let mut second = first.clone();

        first.merge(Utc::now());
        let saved = repo.update(&first).await.unwrap();
        assert_eq!(saved.version, 1);
        assert_eq!(repo.get("pr-1").await.unwrap(), saved);

        second.replace_reviewer("b", "d");
        assert!(matches!(repo.update(&second).await, Err(Error::Stale(_))));

        let stored = repo.get("pr-1").await.unwrap();
        assert_eq!(stored.status, PrStatus::Merged);
        assert_eq!(stored.assigned_reviewers, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let (db, _temp) = setup_test_db().await;
        let repo = PullRequestRepository::new(db.pool());
        let ghost = open_pr("ghost", "a", &[]);
        assert!(matches!(
            repo.update(&ghost).await,
            Err(Error::NotFound(Entity::PullRequest, _))
        ));
    }

    #[tokio::test]
    async fn test_list_by_reviewer() {
        let (db, _temp) = setup_test_db().await;
        let repo = PullRequestRepository::new(db.pool());

        let mut older = open_pr("pr-z", "a", &["b"]);
        older.created_at = Utc::now() - Duration::hours(1);
        repo.insert(&older).await.unwrap();
        repo.insert(&open_pr("pr-a", "a", &["c", "b"])).await.unwrap();
        repo.insert(&open_pr("pr-m", "b", &["c"])).await.unwrap();

        let ids: Vec<String> = repo
            .list_by_reviewer("b")
            .await
            .unwrap()
            .into_iter()
            .map(|pr| pr.pull_request_id)
            .collect();
        assert_eq!(ids, vec!["pr-z", "pr-a"]);

        assert!(repo.list_by_reviewer("").await.unwrap().is_empty());
        assert_eq!(repo.list_by_reviewer("c").await.unwrap().len(), 2);
    }
}

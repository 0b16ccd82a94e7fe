//! `roster_core` store traits backed by SQLite

use async_trait::async_trait;
use roster_core::store::{MembershipStore, PullRequestStore, Store};
use roster_core::{PullRequest, Team, User};

use crate::db::{Database, DatabaseConfig};
use crate::repos::{PullRequestRepository, TeamRepository, UserRepository};

type CoreResult<T> = roster_core::Result<T>;

/// SQLite-backed [`Store`]
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connect and make sure the schema exists
    pub async fn open(config: DatabaseConfig) -> crate::Result<Self> {
        let db = Database::connect(config).await?;
        db.migrate().await?;
        Ok(Self::new(db))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn teams(&self) -> TeamRepository<'_> {
        TeamRepository::new(self.db.pool())
    }

    fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self.db.pool())
    }

    fn pull_requests(&self) -> PullRequestRepository<'_> {
        PullRequestRepository::new(self.db.pool())
    }
}

#[async_trait]
impl MembershipStore for SqliteStore {
    async fn create_team(&self, team: &Team) -> CoreResult<Team> {
        Ok(self.teams().create(team).await?)
    }

    async fn get_team(&self, team_name: &str) -> CoreResult<Team> {
        Ok(self.teams().get(team_name).await?)
    }

    async fn get_user(&self, user_id: &str) -> CoreResult<User> {
        Ok(self.users().get(user_id).await?)
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> CoreResult<User> {
        Ok(self.users().set_active(user_id, is_active).await?)
    }

    async fn active_team_members(
        &self,
        team_name: &str,
        exclude_user_id: &str,
    ) -> CoreResult<Vec<User>> {
        Ok(self.users().active_in_team(team_name, exclude_user_id).await?)
    }

    async fn deactivate_team(&self, team_name: &str) -> CoreResult<u64> {
        Ok(self.teams().deactivate(team_name).await?)
    }
}

#[async_trait]
impl PullRequestStore for SqliteStore {
    async fn pull_request_exists(&self, pull_request_id: &str) -> CoreResult<bool> {
        Ok(self.pull_requests().exists(pull_request_id).await?)
    }

    async fn insert_pull_request(&self, pr: &PullRequest) -> CoreResult<()> {
        Ok(self.pull_requests().insert(pr).await?)
    }

    async fn get_pull_request(&self, pull_request_id: &str) -> CoreResult<PullRequest> {
        Ok(self.pull_requests().get(pull_request_id).await?)
    }

    async fn update_pull_request(&self, pr: &PullRequest) -> CoreResult<PullRequest> {
        Ok(self.pull_requests().update(pr).await?)
    }

    async fn pull_requests_by_reviewer(&self, user_id: &str) -> CoreResult<Vec<PullRequest>> {
        Ok(self.pull_requests().list_by_reviewer(user_id).await?)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn ping(&self) -> CoreResult<()> {
        Ok(self.db.ping().await?)
    }
}

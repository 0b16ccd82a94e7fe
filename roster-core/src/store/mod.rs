//! Storage abstraction for teams, users and pull requests
//!
//! The engine only talks to these traits. Implementations provide the
//! backend (in-memory here, SQLite in `roster-db`) and own all transaction
//! discipline: team creation is all-or-nothing, pull request ids are unique
//! at the store level, and pull request updates are conditional on the
//! version that was read.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::model::{PullRequest, Team, User};
use crate::Result;

/// Team and user records
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Create a team and upsert its members in one atomic step.
    ///
    /// Fails with `AlreadyExists` if the team name is taken. A member whose
    /// `user_id` already exists is rebound to this team.
    async fn create_team(&self, team: &Team) -> Result<Team>;

    /// Fetch a team with its members ordered by `user_id`.
    async fn get_team(&self, team_name: &str) -> Result<Team>;

    async fn get_user(&self, user_id: &str) -> Result<User>;

    /// Set only a user's activity flag and return the stored user.
    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User>;

    /// Active members of `team_name` other than `exclude_user_id`, ordered by `user_id`.
    async fn active_team_members(&self, team_name: &str, exclude_user_id: &str)
        -> Result<Vec<User>>;

    /// Mark every active member of a team inactive, returning how many changed.
    async fn deactivate_team(&self, team_name: &str) -> Result<u64>;
}

/// Pull request records
#[async_trait]
pub trait PullRequestStore: Send + Sync {
    async fn pull_request_exists(&self, pull_request_id: &str) -> Result<bool>;

    /// Insert a new pull request; `AlreadyExists` if the id is taken.
    async fn insert_pull_request(&self, pr: &PullRequest) -> Result<()>;

    async fn get_pull_request(&self, pull_request_id: &str) -> Result<PullRequest>;

    /// Write back status, reviewers and `merged_at`.
    ///
    /// Succeeds only if the stored version still equals `pr.version`; the
    /// returned record carries the incremented version. A mismatch is a
    /// `Conflict`.
    async fn update_pull_request(&self, pr: &PullRequest) -> Result<PullRequest>;

    /// Pull requests listing `user_id` as a reviewer, oldest first.
    async fn pull_requests_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>>;
}

/// Full backing store for the engine
#[async_trait]
pub trait Store: MembershipStore + PullRequestStore {
    /// Cheap round trip proving the backend is reachable.
    async fn ping(&self) -> Result<()>;
}

//! Review assignment engine
//!
//! Picks reviewers for new pull requests and replaces reviewers on request.
//! The engine keeps no state between calls: every operation reads what it
//! needs from the [`Store`], decides, and writes back once.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::AssignmentConfig;
use crate::error::{Entity, Error, Result};
use crate::model::{PullRequest, PullRequestShort, Team, User};
use crate::random::{choose_up_to, RandomSource};
use crate::store::Store;

/// Team, user and pull request operations over a shared store
#[derive(Clone)]
pub struct ReviewEngine {
    store: Arc<dyn Store>,
    rng: Arc<dyn RandomSource>,
    config: AssignmentConfig,
}

impl ReviewEngine {
    pub fn new(store: Arc<dyn Store>, rng: Arc<dyn RandomSource>, config: AssignmentConfig) -> Self {
        Self { store, rng, config }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    /// Create a team and upsert its members
    pub async fn create_team(&self, team: Team) -> Result<Team> {
        team.validate()?;

        // Users already bound elsewhere are moved; surface that in the logs.
        for member in &team.members {
            match self.store.get_user(&member.user_id).await {
                Ok(existing) if existing.team_name != team.team_name => {
                    warn!(
                        user_id = %member.user_id,
                        from_team = %existing.team_name,
                        to_team = %team.team_name,
                        "Moving user to new team"
                    );
                }
                Ok(_) | Err(Error::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let created = self.store.create_team(&team).await?;
        info!(
            team_name = %created.team_name,
            members = created.members.len(),
            "Team created"
        );
        Ok(created)
    }

    pub async fn get_team(&self, team_name: &str) -> Result<Team> {
        require("team_name", team_name)?;
        self.store.get_team(team_name).await
    }

    /// Toggle a user's activity flag
    ///
    /// Pull requests already naming the user as reviewer are left alone.
    pub async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        require("user_id", user_id)?;

        let user = self.store.set_user_active(user_id, is_active).await?;

        info!(user_id = %user.user_id, is_active, "User activity updated");
        Ok(user)
    }

    /// Deactivate every active member of a team
    pub async fn deactivate_team(&self, team_name: &str) -> Result<u64> {
        require("team_name", team_name)?;

        let count = self.store.deactivate_team(team_name).await?;
        info!(team_name, deactivated = count, "Team deactivated");
        Ok(count)
    }

    /// Pull requests the user is assigned to review
    pub async fn reviews_for(&self, user_id: &str) -> Result<Vec<PullRequestShort>> {
        require("user_id", user_id)?;

        let prs = self.store.pull_requests_by_reviewer(user_id).await?;
        Ok(prs.iter().map(PullRequestShort::from).collect())
    }

    /// Open a pull request and assign up to `max_reviewers` active teammates
    pub async fn create_pull_request(
        &self,
        pull_request_id: &str,
        pull_request_name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        require("pull_request_id", pull_request_id)?;
        require("pull_request_name", pull_request_name)?;
        require("author_id", author_id)?;

        // Fast path only; the insert below is what actually enforces uniqueness.
        if self.store.pull_request_exists(pull_request_id).await? {
            debug!(pull_request_id, "Pull request already exists");
            return Err(Error::already_exists(Entity::PullRequest, pull_request_id));
        }

        let author = self.store.get_user(author_id).await?;
        let pool = self
            .store
            .active_team_members(&author.team_name, &author.user_id)
            .await?;
        let pool: Vec<String> = pool.into_iter().map(|u| u.user_id).collect();

        let reviewers = choose_up_to(pool, self.config.max_reviewers, self.rng.as_ref());
        let pr = PullRequest::open(
            pull_request_id,
            pull_request_name,
            author_id,
            reviewers,
            Utc::now(),
        );

        self.store.insert_pull_request(&pr).await?;

        info!(
            pull_request_id,
            author_id,
            reviewers = ?pr.assigned_reviewers,
            "Pull request created"
        );
        Ok(pr)
    }

    /// Merge a pull request; merging twice returns the stored record unchanged
    pub async fn merge_pull_request(&self, pull_request_id: &str) -> Result<PullRequest> {
        require("pull_request_id", pull_request_id)?;

        let mut pr = self.store.get_pull_request(pull_request_id).await?;
        if !pr.merge(Utc::now()) {
            debug!(pull_request_id, "Pull request already merged");
            return Ok(pr);
        }

        let pr = self.store.update_pull_request(&pr).await?;
        info!(pull_request_id, "Pull request merged");
        Ok(pr)
    }

    /// Replace one reviewer with a random active teammate of theirs
    ///
    /// Returns the updated pull request and the id of the new reviewer. The
    /// replacement takes the old reviewer's slot.
    pub async fn reassign_reviewer(
        &self,
        pull_request_id: &str,
        old_reviewer_id: &str,
    ) -> Result<(PullRequest, String)> {
        require("pull_request_id", pull_request_id)?;
        require("old_reviewer_id", old_reviewer_id)?;

        let mut pr = self.store.get_pull_request(pull_request_id).await?;

        if pr.is_merged() {
            debug!(pull_request_id, "Cannot reassign on merged pull request");
            return Err(Error::AlreadyMerged(pull_request_id.to_string()));
        }

        if !pr.has_reviewer(old_reviewer_id) {
            return Err(Error::ReviewerNotAssigned {
                pull_request_id: pull_request_id.to_string(),
                reviewer_id: old_reviewer_id.to_string(),
            });
        }

        let old_reviewer = self.store.get_user(old_reviewer_id).await?;
        let teammates = self
            .store
            .active_team_members(&old_reviewer.team_name, old_reviewer_id)
            .await?;

        let excluded: HashSet<&str> = pr
            .assigned_reviewers
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(pr.author_id.as_str()))
            .collect();
        let candidates: Vec<String> = teammates
            .into_iter()
            .map(|u| u.user_id)
            .filter(|id| !excluded.contains(id.as_str()))
            .collect();

        if candidates.is_empty() {
            debug!(pull_request_id, old_reviewer_id, "No replacement reviewer available");
            return Err(Error::NoAvailableReviewers(pull_request_id.to_string()));
        }

        let new_reviewer = candidates[self.rng.below(candidates.len())].clone();
        pr.replace_reviewer(old_reviewer_id, new_reviewer.clone());

        let pr = self.store.update_pull_request(&pr).await?;
        info!(
            pull_request_id,
            old_reviewer_id,
            new_reviewer_id = %new_reviewer,
            "Reviewer reassigned"
        );
        Ok((pr, new_reviewer))
    }

    /// Check that the backing store is reachable
    pub async fn health(&self) -> Result<()> {
        self.store.ping().await
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("{field} is required")));
    }
    Ok(())
}

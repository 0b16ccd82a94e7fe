//! In-memory implementation of [`Store`].
//!
//! All records live in one map set behind a single `RwLock`, so every
//! operation is atomic with respect to the others. State is lost on restart.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MembershipStore, PullRequestStore, Store};
use crate::error::{Entity, Error, Result};
use crate::model::{PullRequest, Team, TeamMember, User};

#[derive(Debug, Default)]
struct Inner {
    teams: BTreeSet<String>,
    users: BTreeMap<String, User>,
    pull_requests: HashMap<String, PullRequest>,
}

impl Inner {
    fn team(&self, team_name: &str) -> Team {
        let members = self
            .users
            .values()
            .filter(|u| u.team_name == team_name)
            .cloned()
            .map(TeamMember::from)
            .collect();
        Team::new(team_name, members)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn create_team(&self, team: &Team) -> Result<Team> {
        let mut inner = self.inner.write().await;

        if inner.teams.contains(&team.team_name) {
            return Err(Error::already_exists(Entity::Team, &team.team_name));
        }

        inner.teams.insert(team.team_name.clone());
        for member in &team.members {
            inner
                .users
                .insert(member.user_id.clone(), User::from_member(member, &team.team_name));
        }

        Ok(inner.team(&team.team_name))
    }

    async fn get_team(&self, team_name: &str) -> Result<Team> {
        let inner = self.inner.read().await;
        if !inner.teams.contains(team_name) {
            return Err(Error::not_found(Entity::Team, team_name));
        }
        Ok(inner.team(team_name))
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::not_found(Entity::User, user_id))
    }

    async fn set_user_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(user_id) {
            Some(stored) => {
                stored.is_active = is_active;
                Ok(stored.clone())
            }
            None => Err(Error::not_found(Entity::User, user_id)),
        }
    }

    async fn active_team_members(
        &self,
        team_name: &str,
        exclude_user_id: &str,
    ) -> Result<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .filter(|u| u.team_name == team_name && u.is_active && u.user_id != exclude_user_id)
            .cloned()
            .collect())
    }

    async fn deactivate_team(&self, team_name: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;
        if !inner.teams.contains(team_name) {
            return Err(Error::not_found(Entity::Team, team_name));
        }

        let mut changed = 0;
        for user in inner.users.values_mut() {
            if user.team_name == team_name && user.is_active {
                user.is_active = false;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl PullRequestStore for MemoryStore {
    async fn pull_request_exists(&self, pull_request_id: &str) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .await
            .pull_requests
            .contains_key(pull_request_id))
    }

    async fn insert_pull_request(&self, pr: &PullRequest) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.pull_requests.contains_key(&pr.pull_request_id) {
            return Err(Error::already_exists(
                Entity::PullRequest,
                &pr.pull_request_id,
            ));
        }
        if !inner.users.contains_key(&pr.author_id) {
            return Err(Error::not_found(Entity::User, &pr.author_id));
        }

        inner
            .pull_requests
            .insert(pr.pull_request_id.clone(), pr.clone());
        Ok(())
    }

    async fn get_pull_request(&self, pull_request_id: &str) -> Result<PullRequest> {
        let inner = self.inner.read().await;
        inner
            .pull_requests
            .get(pull_request_id)
            .cloned()
            .ok_or_else(|| Error::not_found(Entity::PullRequest, pull_request_id))
    }

    async fn update_pull_request(&self, pr: &PullRequest) -> Result<PullRequest> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .pull_requests
            .get_mut(&pr.pull_request_id)
            .ok_or_else(|| Error::not_found(Entity::PullRequest, &pr.pull_request_id))?;

        if stored.version != pr.version {
            return Err(Error::Conflict(format!(
                "pull request {} was modified concurrently",
                pr.pull_request_id
            )));
        }

        stored.status = pr.status;
        stored.assigned_reviewers = pr.assigned_reviewers.clone();
        stored.merged_at = pr.merged_at;
        stored.version += 1;
        Ok(stored.clone())
    }

    async fn pull_requests_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequest>> {
        let inner = self.inner.read().await;
        let mut prs: Vec<PullRequest> = inner
            .pull_requests
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .cloned()
            .collect();
        prs.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.pull_request_id.cmp(&b.pull_request_id))
        });
        Ok(prs)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn core_team() -> Team {
        Team::new(
            "core",
            vec![
                TeamMember::new("u2", "Bob", true),
                TeamMember::new("u1", "Alice", true),
                TeamMember::new("u3", "Carol", false),
            ],
        )
    }

    #[tokio::test]
    async fn test_create_and_get_team() {
        let store = MemoryStore::new();
        let created = store.create_team(&core_team()).await.unwrap();
        let ids: Vec<_> = created.members.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);

        let fetched = store.get_team("core").await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_team_rejected() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();
        let err = store.create_team(&core_team()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::AlreadyExists {
                entity: Entity::Team,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_member_moves_between_teams() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();
        store
            .create_team(&Team::new(
                "infra",
                vec![TeamMember::new("u2", "Bobby", true)],
            ))
            .await
            .unwrap();

        let bob = store.get_user("u2").await.unwrap();
        assert_eq!(bob.team_name, "infra");
        assert_eq!(bob.username, "Bobby");
        assert_eq!(store.get_team("core").await.unwrap().members.len(), 2);
    }

    #[tokio::test]
    async fn test_active_members_filter() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();
        let active = store.active_team_members("core", "u1").await.unwrap();
        let ids: Vec<_> = active.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u2"]);
    }

    #[tokio::test]
    async fn test_deactivate_team_counts_changes() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();
        assert_eq!(store.deactivate_team("core").await.unwrap(), 2);
        assert_eq!(store.deactivate_team("core").await.unwrap(), 0);
        assert!(store.deactivate_team("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_update_is_version_checked() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();

        let pr = PullRequest::open("pr-1", "Fix", "u1", vec!["u2".into()], Utc::now());
        store.insert_pull_request(&pr).await.unwrap();

        let mut first = store.get_pull_request("pr-1").await.unwrap();
        let mut second = first.clone();

        first.merge(Utc::now());
        let saved = store.update_pull_request(&first).await.unwrap();
        assert_eq!(saved.version, 1);

        second.replace_reviewer("u2", "u3");
        let err = store.update_pull_request(&second).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let stored = store.get_pull_request("pr-1").await.unwrap();
        assert_eq!(stored.assigned_reviewers, vec!["u2"]);
    }

    #[tokio::test]
    async fn test_by_reviewer_ordering() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();

        let t0 = Utc::now();
        let later = PullRequest::open("pr-b", "B", "u1", vec!["u2".into()], t0);
        let earlier = PullRequest::open(
            "pr-a",
            "A",
            "u1",
            vec!["u2".into()],
            t0 - chrono::Duration::minutes(5),
        );
        let unrelated = PullRequest::open("pr-c", "C", "u2", vec!["u1".into()], t0);
        for pr in [&later, &earlier, &unrelated] {
            store.insert_pull_request(pr).await.unwrap();
        }

        let ids: Vec<_> = store
            .pull_requests_by_reviewer("u2")
            .await
            .unwrap()
            .into_iter()
            .map(|pr| pr.pull_request_id)
            .collect();
        assert_eq!(ids, vec!["pr-a", "pr-b"]);
    }

    #[tokio::test]
    async fn test_set_user_active_only_touches_flag() {
        let store = MemoryStore::new();
        store.create_team(&core_team()).await.unwrap();
        store
            .create_team(&Team::new("infra", vec![TeamMember::new("u1", "Alice", true)]))
            .await
            .unwrap();

        let user = store.set_user_active("u1", false).await.unwrap();
        assert_eq!(user.team_name, "infra");
        assert!(!user.is_active);

        let err = store.set_user_active("ghost", true).await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: Entity::User,
                ..
            }
        ));
    }
}

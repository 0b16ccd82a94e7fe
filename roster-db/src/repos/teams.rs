//! Team repository: team rows plus their member upserts

use roster_core::{Entity, Team, TeamMember, User};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::UserRow;

/// Repository for teams and their membership
pub struct TeamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TeamRepository<'a> {
    /// Create a new team repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the team and upsert every member in one transaction
    ///
    /// A duplicate team name rolls everything back and reports `Duplicate`.
    pub async fn create(&self, team: &Team) -> Result<Team> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO teams (team_name) VALUES (?)")
            .bind(&team.team_name)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::on_unique(e, Entity::Team, &team.team_name))?;

        for member in &team.members {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, username, team_name, is_active)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (user_id) DO UPDATE SET
                    username = excluded.username,
                    team_name = excluded.team_name,
                    is_active = excluded.is_active
                "#,
            )
            .bind(&member.user_id)
            .bind(&member.username)
            .bind(&team.team_name)
            .bind(member.is_active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(team_name = %team.team_name, "Committed team");

        self.get(&team.team_name).await
    }

    /// Whether a team with this name exists
    pub async fn exists(&self, team_name: &str) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams WHERE team_name = ?")
            .bind(team_name)
            .fetch_one(self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Get a team and its members ordered by user id
    pub async fn get(&self, team_name: &str) -> Result<Team> {
        if !self.exists(team_name).await? {
            return Err(Error::NotFound(Entity::Team, team_name.to_string()));
        }

        let members = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, team_name, is_active FROM users WHERE team_name = ? ORDER BY user_id",
        )
        .bind(team_name)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(|row| TeamMember::from(User::from(row)))
        .collect();

        Ok(Team::new(team_name, members))
    }

    /// Flip every active member to inactive, returning the number changed
    pub async fn deactivate(&self, team_name: &str) -> Result<u64> {
        if !self.exists(team_name).await? {
            return Err(Error::NotFound(Entity::Team, team_name.to_string()));
        }

        let result =
            sqlx::query("UPDATE users SET is_active = 0 WHERE team_name = ? AND is_active = 1")
                .bind(team_name)
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DatabaseConfig};
    use tempfile::TempDir;

    async fn setup_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let config = DatabaseConfig::new(&db_path);
        let db = Database::connect(config).await.unwrap();
        db.migrate().await.unwrap();
        (db, temp_dir)
    }

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
        let (db, _temp) = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());

        let created = repo.create(&core_team()).await.unwrap();
        assert_eq!(created.team_name, "core");
        let ids: Vec<_> = created.members.iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
        assert!(!created.members[2].is_active);

        assert_eq!(repo.get("core").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_duplicate_team_rolls_back() {
        let (db, _temp) = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());
        repo.create(&core_team()).await.unwrap();

        let again = Team::new("core", vec![TeamMember::new("u9", "Zed", true)]);
        let err = repo.create(&again).await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(Entity::Team, _)));

        // u9 must not have been written
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE user_id = 'u9'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_member_upsert_moves_user() {
        let (db, _temp) = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());
        repo.create(&core_team()).await.unwrap();

        let infra = Team::new("infra", vec![TeamMember::new("u1", "Alice B", false)]);
        let created = repo.create(&infra).await.unwrap();
        assert_eq!(created.members, vec![TeamMember::new("u1", "Alice B", false)]);
        assert_eq!(repo.get("core").await.unwrap().members.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_team_is_found() {
        let (db, _temp) = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());
        repo.create(&Team::new("empty", vec![])).await.unwrap();

        assert!(repo.get("empty").await.unwrap().members.is_empty());
        assert!(matches!(
            repo.get("missing").await,
            Err(Error::NotFound(Entity::Team, _))
        ));
    }

    #[tokio::test]
    async fn test_deactivate() {
        let (db, _temp) = setup_test_db().await;
        let repo = TeamRepository::new(db.pool());
        repo.create(&core_team()).await.unwrap();

        assert_eq!(repo.deactivate("core").await.unwrap(), 2);
        assert!(repo
            .get("core")
            .await
            .unwrap()
            .members
            .iter()
            .all(|m| !m.is_active));
        assert!(repo.deactivate("nope").await.is_err());
    }
}

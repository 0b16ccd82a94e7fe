//! User repository

use roster_core::{Entity, User};
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::schema::UserRow;

/// Repository for user records
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &str) -> Result<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, team_name, is_active FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map(User::from)
        .map_err(|e| Error::on_missing(e, Entity::User, user_id))
    }

    /// Write only the activity flag; team and username are left as stored
    pub async fn set_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE user_id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(Entity::User, user_id.to_string()));
        }

        self.get(user_id).await
    }

    /// Active members of a team other than `exclude_user_id`, ordered by id
    pub async fn active_in_team(&self, team_name: &str, exclude_user_id: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, team_name, is_active
            FROM users
            WHERE team_name = ? AND is_active = 1 AND user_id != ?
            ORDER BY user_id
            "#,
        )
        .bind(team_name)
        .bind(exclude_user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

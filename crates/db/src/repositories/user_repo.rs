//! Repository for the `users` table.

use sqlx::PgExecutor;

use crate::models::user::{NewUser, User};

const COLUMNS: &str = "id, username, email, password_hash, role, is_active, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create<'e, E>(executor: E, user: &NewUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.role)
            .fetch_one(executor)
            .await
    }

    /// Login lookup. Usernames are matched exactly.
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(executor)
            .await
    }
}

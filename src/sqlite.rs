use async_trait::async_trait;
use sqlx::{
    Database,
    sqlite::Sqlite
};

use crate::{
    db::{DatabaseClient, DatabaseError},
    model::User
};

#[derive(Clone)]
pub struct SqlxDatabaseClient<DB: Database>(pub sqlx::Pool<DB>);

#[async_trait]
impl DatabaseClient for SqlxDatabaseClient<Sqlite> {
    async fn get_user_by_email(
        &self,
        email: &str
    ) -> Result<Option<User>, DatabaseError>
    {
        Ok(
            sqlx::query_as::<_, User>(
                "
SELECT user_id, email, password_hash, first_name, last_name, role, is_active
FROM users
WHERE email = ?
                "
            )
            .bind(email)
            .fetch_optional(&self.0)
            .await?
        )
    }

    async fn get_user(
        &self,
        user_id: &str
    ) -> Result<Option<User>, DatabaseError>
    {
        Ok(
            sqlx::query_as::<_, User>(
                "
SELECT user_id, email, password_hash, first_name, last_name, role, is_active
FROM users
WHERE user_id = ?
                "
            )
            .bind(user_id)
            .fetch_optional(&self.0)
            .await?
        )
    }

    async fn list_users(
        &self,
        limit: u32,
        offset: u32
    ) -> Result<Vec<User>, DatabaseError>
    {
        Ok(
            sqlx::query_as::<_, User>(
                "
SELECT user_id, email, password_hash, first_name, last_name, role, is_active
FROM users
ORDER BY user_id
LIMIT ? OFFSET ?
                "
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.0)
            .await?
        )
    }

    async fn insert_user(
        &self,
        user: &User
    ) -> Result<bool, DatabaseError>
    {
        let result = sqlx::query(
            "
INSERT OR IGNORE INTO users (
    user_id,
    email,
    password_hash,
    first_name,
    last_name,
    role,
    is_active
)
VALUES (?, ?, ?, ?, ?, ?, ?)
            "
        )
        .bind(&user.user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(user.is_active)
        .execute(&self.0)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

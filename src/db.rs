use async_trait::async_trait;
use thiserror::Error;

use crate::model::User;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct DatabaseError(#[from] pub sqlx::Error);

#[async_trait]
pub trait DatabaseClient {
    async fn get_user_by_email(
        &self,
        _email: &str
    ) -> Result<Option<User>, DatabaseError>
    {
        unimplemented!();
    }

    async fn get_user(
        &self,
        _user_id: &str
    ) -> Result<Option<User>, DatabaseError>
    {
        unimplemented!();
    }

    async fn list_users(
        &self,
        _limit: u32,
        _offset: u32
    ) -> Result<Vec<User>, DatabaseError>
    {
        unimplemented!();
    }

    // false means the email is already taken
    async fn insert_user(
        &self,
        _user: &User
    ) -> Result<bool, DatabaseError>
    {
        unimplemented!();
    }
}

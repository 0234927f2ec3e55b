use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    errors::AppError,
    model::{Session, UserCreateParams, UserSummary}
};

#[async_trait]
pub trait Core {
    async fn login(
        &self,
        _email: &str,
        _password: &str
    ) -> Result<Session, AppError> {
        unimplemented!();
    }

    async fn list_users(
        &self,
        _limit: u32,
        _offset: u32
    ) -> Result<Vec<UserSummary>, AppError> {
        unimplemented!();
    }

    async fn get_user(
        &self,
        _user_id: &str
    ) -> Result<UserSummary, AppError> {
        unimplemented!();
    }

    async fn create_user(
        &self,
        _params: &UserCreateParams
    ) -> Result<UserSummary, AppError> {
        unimplemented!();
    }
}

pub type CoreArc = Arc<dyn Core + Send + Sync>;

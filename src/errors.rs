use thiserror::Error;

use crate::{
    db::DatabaseError,
    jwt::IssueError
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("insufficient role")]
    InsufficientRole,
    #[error("invalid email or password")]
    Unauthorized,
    #[error("email already in use")]
    DuplicateEmail,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    DatabaseError(String),
    #[error("internal error")]
    InternalError
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<IssueError> for AppError {
    fn from(_: IssueError) -> Self {
        AppError::InternalError
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(_: bcrypt::BcryptError) -> Self {
        AppError::InternalError
    }
}

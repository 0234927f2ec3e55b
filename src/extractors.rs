use axum::{
    extract::FromRequestParts,
    http::request::Parts
};

use crate::{
    errors::AppError,
    gate::{USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER},
    model::Identity
};

// The identity the gate attached to a forwarded admin API request. Handlers
// take this instead of re-verifying the credential.
pub struct AdminIdentity(pub Identity);

fn header(parts: &Parts, name: &str) -> Result<String, AppError> {
    parts.headers
        .get(name)
        .ok_or(AppError::MissingCredential)?
        .to_str()
        .map(str::to_owned)
        .or(Err(AppError::InvalidCredential))
}

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S
    ) -> Result<Self, Self::Rejection>
    {
        Ok(
            AdminIdentity(
                Identity {
                    user_id: header(parts, USER_ID_HEADER)?,
                    email: header(parts, USER_EMAIL_HEADER)?,
                    role: header(parts, USER_ROLE_HEADER)?
                }
            )
        )
    }
}

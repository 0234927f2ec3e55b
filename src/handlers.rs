use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::{
    core::CoreArc,
    errors::AppError,
    extractors::AdminIdentity,
    gate::Gate,
    model::{
        Identity, LoginParams, Token, UserCreateParams, UserListParams,
        UserSummary
    }
};

pub async fn root_get() -> &'static str {
    "shoex admin gate"
}

pub async fn login_post(
    State(core): State<CoreArc>,
    State(gate): State<Arc<Gate>>,
    jar: CookieJar,
    Json(params): Json<LoginParams>
) -> Result<(CookieJar, Json<Token>), AppError>
{
    let session = core.login(&params.email, &params.password).await?;

    let expires = OffsetDateTime::from_unix_timestamp(session.expires)
        .or(Err(AppError::InternalError))?;

    // the cookie is the fallback transport the gate accepts
    let jar = jar.add(
        Cookie::build((gate.cookie_name().to_owned(), session.token.clone()))
            .path("/")
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Lax)
            .expires(expires)
    );

    Ok((jar, Json(Token { token: session.token })))
}

pub async fn logout_post(
    State(gate): State<Arc<Gate>>,
    jar: CookieJar
) -> (CookieJar, ())
{
    (
        jar.remove(
            Cookie::build((gate.cookie_name().to_owned(), "")).path("/")
        ),
        ()
    )
}

pub async fn me_get(AdminIdentity(identity): AdminIdentity) -> Json<Identity> {
    Json(identity)
}

pub async fn users_get(
    _identity: AdminIdentity,
    Query(params): Query<UserListParams>,
    State(core): State<CoreArc>
) -> Result<Json<Vec<UserSummary>>, AppError>
{
    Ok(Json(core.list_users(params.limit, params.offset).await?))
}

pub async fn users_post(
    AdminIdentity(identity): AdminIdentity,
    State(core): State<CoreArc>,
    Json(params): Json<UserCreateParams>
) -> Result<(StatusCode, Json<UserSummary>), AppError>
{
    let user = core.create_user(&params).await?;
    tracing::info!(actor = %identity.user_id, user = %user.user_id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn users_id_get(
    _identity: AdminIdentity,
    Path(user_id): Path<String>,
    State(core): State<CoreArc>
) -> Result<Json<UserSummary>, AppError>
{
    Ok(Json(core.get_user(&user_id).await?))
}

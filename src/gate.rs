//! The request gate for the administrative namespaces. Every inbound request
//! passes through here; requests under the admin page or admin API prefixes
//! must carry a credential asserting an elevated role before they reach
//! their handlers.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response}
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::{
    config::GateConfig,
    errors::AppError,
    model::{Identity, Role},
    token::Verifier
};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, PartialEq)]
pub enum Decision {
    Allow(Identity),
    Reject(RejectReason)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RejectReason {
    MissingCredential,
    InvalidCredential,
    InsufficientRole
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::MissingCredential => AppError::MissingCredential,
            RejectReason::InvalidCredential => AppError::InvalidCredential,
            RejectReason::InsufficientRole => AppError::InsufficientRole
        }
    }
}

fn under(prefix: &str, path: &str) -> bool {
    path == prefix
        || path.strip_prefix(prefix).is_some_and(|r| r.starts_with('/'))
}

pub struct Gate {
    verifier: Arc<dyn Verifier>,
    cookie_name: String,
    page_prefix: String,
    api_prefix: String,
    login_page: String,
    exempt: Vec<String>
}

impl Gate {
    pub fn new(config: &GateConfig, verifier: Arc<dyn Verifier>) -> Self {
        Gate {
            verifier,
            cookie_name: config.cookie_name.clone(),
            page_prefix: config.page_prefix.clone(),
            api_prefix: config.api_prefix.clone(),
            login_page: config.login_page.clone(),
            exempt: config.exempt_paths.clone()
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn is_protected(&self, path: &str) -> bool {
        under(&self.page_prefix, path) || under(&self.api_prefix, path)
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt.iter().any(|e| e == path)
    }

    pub fn is_api(&self, path: &str) -> bool {
        under(&self.api_prefix, path)
    }

    // Authorization header first, cookie as the fallback transport
    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        headers.get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_owned)
            .or_else(||
                CookieJar::from_headers(headers)
                    .get(&self.cookie_name)
                    .map(|c| c.value().to_owned())
            )
    }

    // Pure decision: a function of the request headers, the verification
    // key, and the clock. Path classification and response mapping happen
    // in the middleware.
    pub fn authorize(&self, headers: &HeaderMap) -> Decision {
        let Some(token) = self.extract(headers) else {
            return Decision::Reject(RejectReason::MissingCredential);
        };

        let identity = match self.verifier.verify(&token) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::debug!(%err, "credential rejected");
                return Decision::Reject(RejectReason::InvalidCredential);
            }
        };

        match Role::parse(&identity.role) {
            Some(role) if role.is_elevated() => Decision::Allow(identity),
            _ => Decision::Reject(RejectReason::InsufficientRole)
        }
    }
}

// Identity facts travel to handlers as request headers, overwriting
// anything the client sent under the same names.
fn inject_identity(
    headers: &mut HeaderMap,
    identity: &Identity
) -> Result<(), axum::http::header::InvalidHeaderValue>
{
    headers.insert(USER_ID_HEADER, HeaderValue::from_str(&identity.user_id)?);
    headers.insert(USER_EMAIL_HEADER, HeaderValue::from_str(&identity.email)?);
    headers.insert(USER_ROLE_HEADER, HeaderValue::from_str(&identity.role)?);
    Ok(())
}

fn reject(gate: &Gate, path: &str, reason: RejectReason) -> Response {
    tracing::warn!(?reason, %path, "admin request rejected");

    if gate.is_api(path) {
        AppError::from(reason).into_response()
    }
    else {
        Redirect::to(&gate.login_page).into_response()
    }
}

pub async fn intercept(
    State(gate): State<Arc<Gate>>,
    mut request: Request,
    next: Next
) -> Response
{
    let path = request.uri().path().to_owned();

    // exemption is checked before any credential extraction
    if !gate.is_protected(&path) || gate.is_exempt(&path) {
        return next.run(request).await;
    }

    match gate.authorize(request.headers()) {
        Decision::Allow(identity) => {
            if gate.is_api(&path)
                && inject_identity(request.headers_mut(), &identity).is_err()
            {
                // claims which cannot travel as headers are no credential
                return reject(&gate, &path, RejectReason::InvalidCredential);
            }

            tracing::debug!(user = %identity.user_id, %path, "admin request allowed");
            next.run(request).await
        },
        Decision::Reject(reason) => reject(&gate, &path, reason)
    }
}

//! Auth Middleware
//!
//! `require_auth` verifies the token and attaches the caller;
//! `require_roles` gates a router on the caller's role.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::VerifyTokenUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::authenticated_user::AuthenticatedUser;
use crate::domain::repository::TokenDenylist;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Header the frontend sends the token in
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<D>
where
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    pub denylist: Arc<D>,
    pub config: Arc<AuthConfig>,
}

impl<D> AuthMiddlewareState<D>
where
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    pub fn new(denylist: Arc<D>, config: Arc<AuthConfig>) -> Self {
        Self { denylist, config }
    }
}

/// `x-access-token` first, then `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let from_header = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    from_header.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|t| !t.is_empty())
    })
}

/// Middleware that requires a valid, non-revoked token
pub async fn require_auth<D>(
    State(state): State<AuthMiddlewareState<D>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let token = extract_token(req.headers())
        .ok_or(AuthError::MissingToken)?
        .to_string();

    let use_case = VerifyTokenUseCase::new(state.denylist.clone(), state.config.clone());
    let caller = use_case.execute(&token).await?;

    tracing::debug!(user_id = %caller.user_id, role = %caller.role, "Token verified");

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

/// Role guard; must run after `require_auth`
///
/// ```ignore
/// const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
/// router.route_layer(from_fn_with_state(ADMIN_ONLY, require_roles))
/// ```
pub async fn require_roles(
    State(allowed): State<&'static [UserRole]>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let caller = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(AuthError::MissingToken)?;

    caller.ensure_role(allowed)?;

    Ok(next.run(req).await)
}

/// The caller attached by `require_auth`
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

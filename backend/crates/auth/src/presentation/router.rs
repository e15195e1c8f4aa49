//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{TokenDenylist, UserRepository};
use crate::domain::value_object::user_role::UserRole;
use crate::infra::{PgUserRepository, RedisTokenDenylist};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth, require_roles};

/// Roles allowed on the user admin routes
pub const USER_ADMIN_ROLES: &[UserRole] = &[UserRole::User, UserRole::Admin];

/// Create the Auth router (`/register`, `/login`, `/logout`, `/me`)
pub fn auth_router(
    repo: PgUserRepository,
    denylist: RedisTokenDenylist,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, denylist, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R, D>(repo: R, denylist: D, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        denylist: Arc::new(denylist),
        config: Arc::new(config),
    };
    let guard = AuthMiddlewareState::new(state.denylist.clone(), state.config.clone());

    let protected = Router::new()
        .route("/logout", post(handlers::logout::<R, D>))
        .route("/me", get(handlers::me::<R, D>))
        .route_layer(from_fn_with_state(guard, require_auth::<D>));

    Router::new()
        .route("/register", post(handlers::register::<R, D>))
        .route("/login", post(handlers::login::<R, D>))
        .merge(protected)
        .with_state(state)
}

/// Create the Users router (`/` GET, PUT, DELETE)
pub fn users_router(
    repo: PgUserRepository,
    denylist: RedisTokenDenylist,
    config: AuthConfig,
) -> Router {
    users_router_generic(repo, denylist, config)
}

/// Create a generic Users router for any repository implementation
pub fn users_router_generic<R, D>(repo: R, denylist: D, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        denylist: Arc::new(denylist),
        config: Arc::new(config),
    };
    let guard = AuthMiddlewareState::new(state.denylist.clone(), state.config.clone());

    // Layers run bottom-up: token first, then role
    Router::new()
        .route(
            "/",
            get(handlers::get_users::<R, D>)
                .put(handlers::update_user::<R, D>)
                .delete(handlers::delete_user::<R, D>),
        )
        .route_layer(from_fn_with_state(USER_ADMIN_ROLES, require_roles))
        .route_layer(from_fn_with_state(guard, require_auth::<D>))
        .with_state(state)
}

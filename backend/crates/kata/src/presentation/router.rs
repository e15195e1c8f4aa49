//! Kata Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use std::sync::Arc;

use auth::{
    AuthMiddlewareState, PgUserRepository, RedisTokenDenylist, TokenDenylist, UserRepository,
    require_auth,
};
use platform::storage::ObjectStorage;

use crate::application::config::KataConfig;
use crate::domain::repository::KataRepository;
use crate::infra::PgKataRepository;
use crate::presentation::handlers::{self, KataAppState};

/// Create the Katas router (`/`, `/stars`, `/participants`, `/files`)
pub fn katas_router(
    repo: PgKataRepository,
    users: PgUserRepository,
    storage: ObjectStorage,
    config: KataConfig,
    guard: AuthMiddlewareState<RedisTokenDenylist>,
) -> Router {
    katas_router_generic(repo, users, storage, config, guard)
}

/// Create a generic Katas router for any repository implementation
pub fn katas_router_generic<K, U, D>(
    repo: K,
    users: U,
    storage: ObjectStorage,
    config: KataConfig,
    guard: AuthMiddlewareState<D>,
) -> Router
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let body_limit = config.upload_body_limit();
    let state = KataAppState {
        repo: Arc::new(repo),
        users: Arc::new(users),
        storage,
        config: Arc::new(config),
    };

    let files = Router::new()
        .route(
            "/files",
            get(handlers::download_file::<K, U>).post(handlers::upload_files::<K, U>),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route(
            "/",
            get(handlers::get_katas::<K, U>)
                .post(handlers::create_kata::<K, U>)
                .put(handlers::update_kata::<K, U>)
                .delete(handlers::delete_kata::<K, U>),
        )
        .route("/stars", put(handlers::rate_kata::<K, U>))
        .route("/participants", put(handlers::join_kata::<K, U>))
        .merge(files)
        .route_layer(from_fn_with_state(guard, require_auth::<D>))
        .with_state(state)
}

/// Create the user katas router (`/katas`), merged under `/api/users`
pub fn user_katas_router(
    repo: PgKataRepository,
    users: PgUserRepository,
    storage: ObjectStorage,
    config: KataConfig,
    guard: AuthMiddlewareState<RedisTokenDenylist>,
) -> Router {
    user_katas_router_generic(repo, users, storage, config, guard)
}

pub fn user_katas_router_generic<K, U, D>(
    repo: K,
    users: U,
    storage: ObjectStorage,
    config: KataConfig,
    guard: AuthMiddlewareState<D>,
) -> Router
where
    K: KataRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let state = KataAppState {
        repo: Arc::new(repo),
        users: Arc::new(users),
        storage,
        config: Arc::new(config),
    };

    Router::new()
        .route("/katas", get(handlers::user_katas::<K, U>))
        .route_layer(from_fn_with_state(guard, require_auth::<D>))
        .with_state(state)
}

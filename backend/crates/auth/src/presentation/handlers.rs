//! HTTP Handlers

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::id::UserId;
use kernel::query::{PageRequest, parse_order};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, LoginInput, LoginUseCase, LogoutUseCase,
    RegisterInput, RegisterUseCase, UpdateUserInput, UpdateUserUseCase,
};
use crate::domain::entity::authenticated_user::AuthenticatedUser;
use crate::domain::repository::{TokenDenylist, UserRepository, UserSortField};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    IdQuery, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    UpdateUserRequest, UserResponse, UsersPageResponse, UsersQuery, require_fields,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, D>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub denylist: Arc<D>,
    pub config: Arc<AuthConfig>,
}

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    raw.parse::<UserId>()
        .map_err(|e| AuthError::App(AppError::from(e)))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, D>(
    State(state): State<AuthAppState<R, D>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    require_fields(&[
        ("name", req.name.is_some()),
        ("email", req.email.is_some()),
        ("password", req.password.is_some()),
        ("age", req.age.is_some()),
    ])?;
    let (Some(name), Some(email), Some(password), Some(age)) =
        (req.name, req.email, req.password, req.age)
    else {
        return Err(AuthError::Validation("Missing fields".into()));
    };

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(RegisterInput {
            name,
            email,
            password,
            age,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: format!("User registered successfully: {}", output.user_name),
            id: output.user_id,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, D>(
    State(state): State<AuthAppState<R, D>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    require_fields(&[
        ("email", req.email.is_some()),
        ("password", req.password.is_some()),
    ])?;
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AuthError::Validation("Missing fields".into()));
    };

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case.execute(LoginInput { email, password }).await?;

    Ok(Json(LoginResponse {
        token: output.token,
        message: format!("Welcome, {}", output.user_name),
        expires_at: output.expires_at,
    }))
}

// ============================================================================
// Logout / Me
// ============================================================================

/// POST /api/auth/logout
pub async fn logout<R, D>(
    State(state): State<AuthAppState<R, D>>,
    caller: AuthenticatedUser,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.denylist.clone(), state.config.clone());
    use_case.execute(&caller).await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/me
pub async fn me<R, D>(
    State(state): State<AuthAppState<R, D>>,
    caller: AuthenticatedUser,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let user = GetUserUseCase::new(state.repo.clone())
        .execute(&caller.user_id)
        .await?;

    Ok(Json(user.into()))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/users
///
/// With `id` returns one user, otherwise a page.
pub async fn get_users<R, D>(
    State(state): State<AuthAppState<R, D>>,
    Query(query): Query<UsersQuery>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    if let Some(id) = query.id.as_deref() {
        let user_id = parse_user_id(id)?;
        let user = GetUserUseCase::new(state.repo.clone())
            .execute(&user_id)
            .await?;
        return Ok(Json(UserResponse::from(user)).into_response());
    }

    let max = state.config.max_page_size;
    let page = PageRequest::new(
        platform::values::parse_number(query.page.as_deref(), 1, u32::MAX as u64),
        platform::values::parse_number(query.limit.as_deref(), 1, max),
        max,
    );
    let sorts = parse_order::<UserSortField>(query.order.as_deref())?;

    let users = ListUsersUseCase::new(state.repo.clone())
        .execute(page, &sorts)
        .await?;

    Ok(Json(UsersPageResponse::from(users)).into_response())
}

/// PUT /api/users?id
pub async fn update_user<R, D>(
    State(state): State<AuthAppState<R, D>>,
    caller: AuthenticatedUser,
    Query(query): Query<IdQuery>,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let id = query.id.ok_or_else(|| {
        AuthError::Validation("Please, provide an ID to update an existing user".into())
    })?;
    let user_id = parse_user_id(&id)?;

    let (Some(name), Some(age)) = (req.name, req.age) else {
        return Err(AuthError::Validation(
            "You need to send all attributes of User to update it".into(),
        ));
    };

    UpdateUserUseCase::new(state.repo.clone())
        .execute(&caller, UpdateUserInput { user_id, name, age })
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "User with id {} updated successfully",
        user_id
    ))))
}

/// DELETE /api/users?id
pub async fn delete_user<R, D>(
    State(state): State<AuthAppState<R, D>>,
    caller: AuthenticatedUser,
    Query(query): Query<IdQuery>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    D: TokenDenylist + Clone + Send + Sync + 'static,
{
    let id = query.id.ok_or_else(|| {
        AuthError::Validation("Please, provide an ID to remove from database".into())
    })?;
    let user_id = parse_user_id(&id)?;

    DeleteUserUseCase::new(state.repo.clone())
        .execute(&caller, &user_id)
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "User with id {} deleted successfully",
        user_id
    ))))
}

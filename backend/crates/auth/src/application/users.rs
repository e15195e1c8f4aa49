//! User Use Cases
//!
//! Read, list, update and delete user documents.

use std::sync::Arc;

use kernel::id::UserId;
use kernel::query::{Page, PageRequest, Sort};

use crate::domain::entity::{authenticated_user::AuthenticatedUser, user::User};
use crate::domain::repository::{UserRepository, UserSortField};
use crate::domain::value_object::{user_age::UserAge, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Get user use case (also backs `/auth/me`)
pub struct GetUserUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// List users use case
pub struct ListUsersUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        page: PageRequest,
        sorts: &[Sort<UserSortField>],
    ) -> AuthResult<Page<User>> {
        let (total, users) =
            tokio::try_join!(self.user_repo.count(), self.user_repo.list(&page, sorts))?;
        Ok(page.into_page(users, total))
    }
}

/// Update user input
pub struct UpdateUserInput {
    pub user_id: UserId,
    pub name: String,
    pub age: i64,
}

/// Update user use case
pub struct UpdateUserUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> UpdateUserUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, input: UpdateUserInput) -> AuthResult<User> {
        if !caller.can_manage(&input.user_id) {
            return Err(AuthError::NotOwner);
        }

        let user_name = UserName::new(&input.name)?;
        let age = UserAge::new(input.age)?;

        if self
            .user_repo
            .exists_by_user_name(&user_name, Some(&input.user_id))
            .await?
        {
            return Err(AuthError::UserNameTaken);
        }

        let user = self
            .user_repo
            .update_profile(&input.user_id, &user_name, age)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %user.user_id, updated_by = %caller.user_id, "User updated");
        Ok(user)
    }
}

/// Delete user use case
pub struct DeleteUserUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, caller: &AuthenticatedUser, user_id: &UserId) -> AuthResult<()> {
        if !caller.can_manage(user_id) {
            return Err(AuthError::NotOwner);
        }

        if !self.user_repo.delete(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, deleted_by = %caller.user_id, "User deleted");
        Ok(())
    }
}

//! In-memory doubles for the user repository and token denylist

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use kernel::id::UserId;
use kernel::query::{PageRequest, Sort, SortDirection};
use platform::password::{ClearTextPassword, PasswordHasherService};

use crate::application::config::AuthConfig;
use crate::domain::entity::authenticated_user::{AuthenticatedUser, Claims};
use crate::domain::entity::user::User;
use crate::domain::repository::{TokenDenylist, UserRepository, UserSortField};
use crate::domain::value_object::{
    email::Email, user_age::UserAge, user_name::UserName, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn compare(a: &User, b: &User, field: UserSortField) -> Ordering {
    match field {
        UserSortField::Name => a.user_name.as_str().cmp(b.user_name.as_str()),
        UserSortField::Email => a.email.as_str().cmp(b.email.as_str()),
        UserSortField::Age => a.age.value().cmp(&b.age.value()),
        UserSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        UserSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with an already-hashed password, bypassing validation
    pub fn seed(&self, name: &str, email: &str, password: &str, role: UserRole) -> User {
        let hasher = PasswordHasherService::default();
        let password = ClearTextPassword::for_verification(password.to_string());
        let hash = hasher
            .hash(&password)
            .unwrap_or_else(|e| panic!("hashing seed password: {e}"));

        let mut user = User::register(
            UserName::from_db(name),
            Email::from_db(email),
            UserAge::from_db(30),
            hash,
        );
        user.role = role;
        lock(&self.users).push(user.clone());
        user
    }

    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = lock(&self.users);
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if users.iter().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(lock(&self.users).iter().find(|u| u.user_id == *user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(lock(&self.users).iter().find(|u| u.email == *email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(lock(&self.users).iter().any(|u| u.email == *email))
    }

    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        except: Option<&UserId>,
    ) -> AuthResult<bool> {
        Ok(lock(&self.users)
            .iter()
            .any(|u| u.user_name == *user_name && Some(&u.user_id) != except))
    }

    async fn list(&self, page: &PageRequest, sorts: &[Sort<UserSortField>]) -> AuthResult<Vec<User>> {
        let mut users = lock(&self.users).clone();
        let default = [Sort::new(UserSortField::CreatedAt, SortDirection::Desc)];
        let sorts = if sorts.is_empty() { &default[..] } else { sorts };

        users.sort_by(|a, b| {
            sorts
                .iter()
                .map(|s| match s.direction {
                    SortDirection::Asc => compare(a, b, s.field),
                    SortDirection::Desc => compare(b, a, s.field),
                })
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });

        Ok(users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self) -> AuthResult<u64> {
        Ok(lock(&self.users).len() as u64)
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        user_name: &UserName,
        age: UserAge,
    ) -> AuthResult<Option<User>> {
        let mut users = lock(&self.users);
        Ok(users.iter_mut().find(|u| u.user_id == *user_id).map(|u| {
            u.update_profile(user_name.clone(), age);
            u.clone()
        }))
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut users = lock(&self.users);
        let before = users.len();
        users.retain(|u| u.user_id != *user_id);
        Ok(users.len() != before)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTokenDenylist {
    /// key -> (expiry, ttl it was revoked with)
    entries: Arc<Mutex<HashMap<String, (Instant, Duration)>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl InMemoryTokenDenylist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the cache were down
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// TTL passed to the last `revoke` of `key`
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        lock(&self.entries).get(key).map(|(_, ttl)| *ttl)
    }

    fn check_available(&self) -> AuthResult<()> {
        if *lock(&self.unavailable) {
            Err(AuthError::DenylistUnavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl TokenDenylist for InMemoryTokenDenylist {
    async fn revoke(&self, key: &str, ttl: Duration) -> AuthResult<()> {
        self.check_available()?;
        lock(&self.entries).insert(key.to_string(), (Instant::now() + ttl, ttl));
        Ok(())
    }

    async fn is_revoked(&self, key: &str) -> AuthResult<bool> {
        self.check_available()?;
        let mut entries = lock(&self.entries);
        match entries.get(key) {
            Some((expires, _)) if *expires > Instant::now() => Ok(true),
            Some(_) => {
                entries.remove(key);
                Ok(false)
            }
            None => Ok(false),
        }
    }
}

/// Sign a token for `user` the way login does
pub fn issue_token(config: &AuthConfig, user: &User) -> String {
    let claims = Claims::for_user(user, chrono::Utc::now(), config.token_ttl_chrono());
    config
        .token_codec
        .sign(&claims)
        .unwrap_or_else(|e| panic!("signing test token: {e}"))
}

/// Caller identity for `user` as `require_auth` would attach it
pub fn caller_for(config: &AuthConfig, user: &User) -> AuthenticatedUser {
    let token = issue_token(config, user);
    let claims = Claims::for_user(user, chrono::Utc::now(), config.token_ttl_chrono());
    AuthenticatedUser::from_claims(claims, token)
}

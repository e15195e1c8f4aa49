use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email, user_age::UserAge, user_name::UserName, user_role::UserRole,
};

/// User document
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Email,
    pub age: UserAge,
    pub role: UserRole,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// New account; every self-registered user starts as [`UserRole::User`].
    pub fn register(
        user_name: UserName,
        email: Email,
        age: UserAge,
        password_hash: HashedPassword,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            email,
            age,
            role: UserRole::User,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_profile(&mut self, user_name: UserName, age: UserAge) {
        self.user_name = user_name;
        self.age = age;
        self.updated_at = Utc::now();
    }
}

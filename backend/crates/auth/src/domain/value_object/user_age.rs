use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const USER_AGE_MAX: i32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAge(i32);

impl UserAge {
    pub fn new(age: i64) -> AppResult<Self> {
        if !(0..=i64::from(USER_AGE_MAX)).contains(&age) {
            return Err(AppError::bad_request(format!(
                "Age must be between 0 and {}",
                USER_AGE_MAX
            )));
        }
        // In range, so the cast is lossless
        Ok(Self(age as i32))
    }

    pub fn from_db(age: i32) -> Self {
        Self(age)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_age_bounds() {
        assert_eq!(UserAge::new(0).unwrap().value(), 0);
        assert_eq!(UserAge::new(150).unwrap().value(), 150);
        assert!(UserAge::new(-1).is_err());
        assert!(UserAge::new(151).is_err());
    }
}

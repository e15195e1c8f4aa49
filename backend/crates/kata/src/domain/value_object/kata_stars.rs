//! Star ratings
//!
//! One 0..=5 rating per participant; the average is recomputed from all
//! ratings on every change.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

pub const MAX_STARS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRating {
    pub user: UserId,
    pub stars: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KataStars {
    pub average: f64,
    pub users: Vec<StarRating>,
}

impl KataStars {
    /// Replace `user`'s rating (or add it) and recompute the mean
    pub fn rate(&mut self, user: UserId, stars: u8) {
        let stars = stars.min(MAX_STARS);
        match self.users.iter_mut().find(|r| r.user == user) {
            Some(rating) => rating.stars = stars,
            None => self.users.push(StarRating { user, stars }),
        }
        self.average = Self::mean(&self.users);
    }

    pub fn rating_of(&self, user: &UserId) -> Option<u8> {
        self.users.iter().find(|r| r.user == *user).map(|r| r.stars)
    }

    fn mean(users: &[StarRating]) -> f64 {
        if users.is_empty() {
            return 0.0;
        }
        let sum: u32 = users.iter().map(|r| u32::from(r.stars)).sum();
        f64::from(sum) / users.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(KataStars::default().average, 0.0);
    }

    #[test]
    fn test_rating_replaces_previous() {
        let ada = UserId::new();
        let grace = UserId::new();
        let mut stars = KataStars::default();

        stars.rate(ada, 5);
        stars.rate(grace, 2);
        assert_eq!(stars.average, 3.5);

        stars.rate(ada, 1);
        assert_eq!(stars.users.len(), 2);
        assert_eq!(stars.rating_of(&ada), Some(1));
        assert_eq!(stars.average, 1.5);
    }

    #[test]
    fn test_stars_capped() {
        let mut stars = KataStars::default();
        stars.rate(UserId::new(), 9);
        assert_eq!(stars.average, 5.0);
    }
}

//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{KataId, UserId};
use kernel::query::{PageRequest, Sort, SortField};

use crate::domain::entity::kata::Kata;
use crate::domain::value_object::kata_level::KataLevel;
use crate::error::KataResult;

/// Sortable kata fields for `order`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KataSortField {
    Name,
    Level,
    Intents,
    Stars,
    CreatedAt,
    UpdatedAt,
}

impl SortField for KataSortField {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(KataSortField::Name),
            "level" => Some(KataSortField::Level),
            "intents" => Some(KataSortField::Intents),
            "stars" | "stars.average" => Some(KataSortField::Stars),
            "created_at" | "createdAt" => Some(KataSortField::CreatedAt),
            "updated_at" | "updatedAt" => Some(KataSortField::UpdatedAt),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            KataSortField::Name => "name",
            KataSortField::Level => "array_position(ARRAY['Basic','Medium','High']::text[], level)",
            KataSortField::Intents => "intents",
            KataSortField::Stars => "(stars->>'average')::float8",
            KataSortField::CreatedAt => "created_at",
            KataSortField::UpdatedAt => "updated_at",
        }
    }
}

/// Equality filters for list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KataFilter {
    pub level: Option<KataLevel>,
    pub creator: Option<UserId>,
}

impl KataFilter {
    pub fn matches(&self, kata: &Kata) -> bool {
        self.level.is_none_or(|level| kata.level == level)
            && self.creator.is_none_or(|creator| kata.creator == creator)
    }
}

/// Kata repository trait
#[trait_variant::make(KataRepository: Send)]
pub trait LocalKataRepository {
    async fn create(&self, kata: &Kata) -> KataResult<()>;

    async fn find_by_id(&self, kata_id: &KataId) -> KataResult<Option<Kata>>;

    async fn list(
        &self,
        filter: &KataFilter,
        page: &PageRequest,
        sorts: &[Sort<KataSortField>],
    ) -> KataResult<Vec<Kata>>;

    async fn count(&self, filter: &KataFilter) -> KataResult<u64>;

    /// Read-modify-write under a row lock.
    ///
    /// Nothing is written when `change` fails. `None` if the kata is absent.
    async fn modify<F>(&self, kata_id: &KataId, change: F) -> KataResult<Option<Kata>>
    where
        F: FnOnce(&mut Kata) -> KataResult<()> + Send;

    /// Returns the deleted kata
    async fn delete(&self, kata_id: &KataId) -> KataResult<Option<Kata>>;
}

//! Read-side Kata Use Cases

use std::sync::Arc;

use auth::UserRepository;
use kernel::id::{KataId, UserId};
use kernel::query::{Page, PageRequest, Sort};

use crate::domain::entity::kata::Kata;
use crate::domain::repository::{KataFilter, KataRepository, KataSortField};
use crate::error::{KataError, KataResult};

/// Get kata use case
pub struct GetKataUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
}

impl<K: KataRepository> GetKataUseCase<K> {
    pub fn new(kata_repo: Arc<K>) -> Self {
        Self { kata_repo }
    }

    pub async fn execute(&self, kata_id: &KataId) -> KataResult<Kata> {
        self.kata_repo
            .find_by_id(kata_id)
            .await?
            .ok_or(KataError::KataNotFound)
    }
}

/// List katas use case
pub struct ListKatasUseCase<K: KataRepository> {
    kata_repo: Arc<K>,
}

impl<K: KataRepository> ListKatasUseCase<K> {
    pub fn new(kata_repo: Arc<K>) -> Self {
        Self { kata_repo }
    }

    /// `total_pages` counts only katas matching `filter`
    pub async fn execute(
        &self,
        filter: KataFilter,
        page: PageRequest,
        sorts: &[Sort<KataSortField>],
    ) -> KataResult<Page<Kata>> {
        let (total, katas) = tokio::try_join!(
            self.kata_repo.count(&filter),
            self.kata_repo.list(&filter, &page, sorts)
        )?;
        Ok(page.into_page(katas, total))
    }
}

/// Katas created by one user
#[derive(Debug)]
pub struct UserKatas {
    pub email: String,
    pub katas: Page<Kata>,
}

pub struct UserKatasUseCase<K, U>
where
    K: KataRepository,
    U: UserRepository,
{
    kata_repo: Arc<K>,
    user_repo: Arc<U>,
}

impl<K, U> UserKatasUseCase<K, U>
where
    K: KataRepository,
    U: UserRepository,
{
    pub fn new(kata_repo: Arc<K>, user_repo: Arc<U>) -> Self {
        Self {
            kata_repo,
            user_repo,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        mut filter: KataFilter,
        page: PageRequest,
        sorts: &[Sort<KataSortField>],
    ) -> KataResult<UserKatas> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(KataError::UserNotFound)?;

        filter.creator = Some(user.user_id);
        let katas = ListKatasUseCase::new(self.kata_repo.clone())
            .execute(filter, page, sorts)
            .await?;

        Ok(UserKatas {
            email: user.email.into_db(),
            katas,
        })
    }
}

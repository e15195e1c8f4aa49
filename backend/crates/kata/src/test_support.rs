//! In-memory double for the kata repository

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::id::{KataId, UserId};
use kernel::query::{PageRequest, Sort, SortDirection};

use crate::domain::entity::kata::{Kata, KataDraft};
use crate::domain::repository::{KataFilter, KataRepository, KataSortField};
use crate::domain::value_object::{kata_level::KataLevel, kata_name::KataName};
use crate::error::KataResult;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn compare(a: &Kata, b: &Kata, field: KataSortField) -> Ordering {
    match field {
        KataSortField::Name => a.name.as_str().cmp(b.name.as_str()),
        KataSortField::Level => a.level.rank().cmp(&b.level.rank()),
        KataSortField::Intents => a.intents.cmp(&b.intents),
        KataSortField::Stars => a.stars.average.total_cmp(&b.stars.average),
        KataSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        KataSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[derive(Clone, Default)]
pub struct InMemoryKataRepository {
    katas: Arc<Mutex<Vec<Kata>>>,
}

impl InMemoryKataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a kata with default fields
    pub fn seed(&self, name: &str, level: KataLevel, creator: UserId, participants: Vec<UserId>) -> Kata {
        let draft = KataDraft {
            name: KataName::from_db(name),
            description: "Default description".into(),
            level,
            intents: 1,
            solution: "Default Solution".into(),
        };
        let kata = Kata::create(draft, creator, participants);
        lock(&self.katas).push(kata.clone());
        kata
    }

    pub fn get(&self, kata_id: &KataId) -> Option<Kata> {
        lock(&self.katas).iter().find(|k| k.kata_id == *kata_id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.katas).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KataRepository for InMemoryKataRepository {
    async fn create(&self, kata: &Kata) -> KataResult<()> {
        lock(&self.katas).push(kata.clone());
        Ok(())
    }

    async fn find_by_id(&self, kata_id: &KataId) -> KataResult<Option<Kata>> {
        Ok(self.get(kata_id))
    }

    async fn list(
        &self,
        filter: &KataFilter,
        page: &PageRequest,
        sorts: &[Sort<KataSortField>],
    ) -> KataResult<Vec<Kata>> {
        let mut katas: Vec<Kata> = lock(&self.katas)
            .iter()
            .filter(|k| filter.matches(k))
            .cloned()
            .collect();

        let default = [Sort::new(KataSortField::CreatedAt, SortDirection::Desc)];
        let sorts = if sorts.is_empty() { &default[..] } else { sorts };
        katas.sort_by(|a, b| {
            sorts
                .iter()
                .map(|s| {
                    let ord = compare(a, b, s.field);
                    match s.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or_else(|| a.kata_id.as_uuid().cmp(b.kata_id.as_uuid()))
        });

        Ok(katas
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count(&self, filter: &KataFilter) -> KataResult<u64> {
        Ok(lock(&self.katas).iter().filter(|k| filter.matches(k)).count() as u64)
    }

    async fn modify<F>(&self, kata_id: &KataId, change: F) -> KataResult<Option<Kata>>
    where
        F: FnOnce(&mut Kata) -> KataResult<()> + Send,
    {
        let mut katas = lock(&self.katas);
        let Some(stored) = katas.iter_mut().find(|k| k.kata_id == *kata_id) else {
            return Ok(None);
        };

        // Work on a copy so a failed change leaves the stored kata untouched
        let mut kata = stored.clone();
        change(&mut kata)?;
        *stored = kata.clone();
        Ok(Some(kata))
    }

    async fn delete(&self, kata_id: &KataId) -> KataResult<Option<Kata>> {
        let mut katas = lock(&self.katas);
        let index = katas.iter().position(|k| k.kata_id == *kata_id);
        Ok(index.map(|i| katas.remove(i)))
    }
}

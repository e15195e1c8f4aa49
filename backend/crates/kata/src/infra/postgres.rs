//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{KataId, UserId};
use kernel::query::{PageRequest, Sort, SortDirection, order_by_sql};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::kata::Kata;
use crate::domain::repository::{KataFilter, KataRepository, KataSortField};
use crate::domain::value_object::{
    kata_level::KataLevel, kata_name::KataName, kata_stars::KataStars,
};
use crate::error::{KataError, KataResult};

const KATA_COLUMNS: &str = "kata_id, name, description, level, intents, stars, creator_id, \
     solution, participants, files, created_at, updated_at";

/// `$1` level, `$2` creator
const KATA_FILTER: &str =
    "($1::text IS NULL OR level = $1) AND ($2::uuid IS NULL OR creator_id = $2)";

/// PostgreSQL-backed kata repository
#[derive(Clone)]
pub struct PgKataRepository {
    pool: PgPool,
}

impl PgKataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn participant_uuids(kata: &Kata) -> Vec<Uuid> {
    kata.participants.iter().map(|id| *id.as_uuid()).collect()
}

// ============================================================================
// Kata Repository Implementation
// ============================================================================

impl KataRepository for PgKataRepository {
    async fn create(&self, kata: &Kata) -> KataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO katas (
                kata_id,
                name,
                description,
                level,
                intents,
                stars,
                creator_id,
                solution,
                participants,
                files,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(kata.kata_id.as_uuid())
        .bind(kata.name.as_str())
        .bind(&kata.description)
        .bind(kata.level.code())
        .bind(kata.intents)
        .bind(Json(&kata.stars))
        .bind(kata.creator.as_uuid())
        .bind(&kata.solution)
        .bind(participant_uuids(kata))
        .bind(&kata.files)
        .bind(kata.created_at)
        .bind(kata.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, kata_id: &KataId) -> KataResult<Option<Kata>> {
        let row = sqlx::query_as::<_, KataRow>(&format!(
            "SELECT {KATA_COLUMNS} FROM katas WHERE kata_id = $1"
        ))
        .bind(kata_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_kata()).transpose()
    }

    async fn list(
        &self,
        filter: &KataFilter,
        page: &PageRequest,
        sorts: &[Sort<KataSortField>],
    ) -> KataResult<Vec<Kata>> {
        let order_by = order_by_sql(
            sorts,
            Sort::new(KataSortField::CreatedAt, SortDirection::Desc),
            "kata_id",
        );

        let rows = sqlx::query_as::<_, KataRow>(&format!(
            "SELECT {KATA_COLUMNS} FROM katas WHERE {KATA_FILTER} \
             ORDER BY {order_by} LIMIT $3 OFFSET $4"
        ))
        .bind(filter.level.map(|l| l.code()))
        .bind(filter.creator.map(|id| *id.as_uuid()))
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_kata()).collect()
    }

    async fn count(&self, filter: &KataFilter) -> KataResult<u64> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM katas WHERE {KATA_FILTER}"))
                .bind(filter.level.map(|l| l.code()))
                .bind(filter.creator.map(|id| *id.as_uuid()))
                .fetch_one(&self.pool)
                .await?;

        Ok(total.max(0) as u64)
    }

    async fn modify<F>(&self, kata_id: &KataId, change: F) -> KataResult<Option<Kata>>
    where
        F: FnOnce(&mut Kata) -> KataResult<()> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, KataRow>(&format!(
            "SELECT {KATA_COLUMNS} FROM katas WHERE kata_id = $1 FOR UPDATE"
        ))
        .bind(kata_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut kata = row.into_kata()?;

        // Dropping `tx` rolls back
        change(&mut kata)?;

        sqlx::query(
            r#"
            UPDATE katas
            SET name = $2,
                description = $3,
                level = $4,
                intents = $5,
                stars = $6,
                solution = $7,
                participants = $8,
                files = $9,
                updated_at = $10
            WHERE kata_id = $1
            "#,
        )
        .bind(kata.kata_id.as_uuid())
        .bind(kata.name.as_str())
        .bind(&kata.description)
        .bind(kata.level.code())
        .bind(kata.intents)
        .bind(Json(&kata.stars))
        .bind(&kata.solution)
        .bind(participant_uuids(&kata))
        .bind(&kata.files)
        .bind(kata.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(kata))
    }

    async fn delete(&self, kata_id: &KataId) -> KataResult<Option<Kata>> {
        let row = sqlx::query_as::<_, KataRow>(&format!(
            "DELETE FROM katas WHERE kata_id = $1 RETURNING {KATA_COLUMNS}"
        ))
        .bind(kata_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_kata()).transpose()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct KataRow {
    kata_id: Uuid,
    name: String,
    description: String,
    level: String,
    intents: i32,
    stars: Json<KataStars>,
    creator_id: Uuid,
    solution: String,
    participants: Vec<Uuid>,
    files: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl KataRow {
    fn into_kata(self) -> KataResult<Kata> {
        let level = KataLevel::from_code(&self.level)
            .map_err(|e| KataError::Internal(format!("Invalid level: {}", e)))?;

        Ok(Kata {
            kata_id: KataId::from_uuid(self.kata_id),
            name: KataName::from_db(self.name),
            description: self.description,
            level,
            intents: self.intents,
            stars: self.stars.0,
            creator: UserId::from_uuid(self.creator_id),
            solution: self.solution,
            participants: self
                .participants
                .into_iter()
                .map(UserId::from_uuid)
                .collect(),
            files: self.files,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

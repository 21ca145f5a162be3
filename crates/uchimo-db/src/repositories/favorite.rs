//! PostgreSQL implementation of FavoriteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use uchimo_core::traits::{FavoriteRepository, RepoResult};
use uchimo_core::{FavoriteRecord, ThreadId, UserId};

use crate::mappers::{corrupt_column, map_rows};
use crate::models::FavoriteModel;

use super::error::map_db_error;

/// PostgreSQL implementation of FavoriteRepository
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    /// Create a new PgFavoriteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    #[instrument(skip(self))]
    async fn exists(&self, user_id: &UserId, thread_id: &ThreadId) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND thread_id = $2)
            "#,
        )
        .bind(user_id.as_str())
        .bind(thread_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn put(&self, record: &FavoriteRecord) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, thread_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, thread_id) DO NOTHING
            "#,
        )
        .bind(record.user_id.as_str())
        .bind(record.thread_id.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &UserId, thread_id: &ThreadId) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites WHERE user_id = $1 AND thread_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(thread_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: &UserId, limit: i64) -> RepoResult<Vec<FavoriteRecord>> {
        let limit = limit.clamp(1, 100);

        let results = sqlx::query_as::<_, FavoriteModel>(
            r#"
            SELECT user_id, thread_id, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn thread_ids_by_user(&self, user_id: &UserId) -> RepoResult<Vec<ThreadId>> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT thread_id FROM favorites WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        ids.into_iter()
            .map(|id| ThreadId::parse(id).map_err(corrupt_column("favorites.thread_id")))
            .collect()
    }
}

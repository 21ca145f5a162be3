//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use uchimo_core::traits::{ReactionRepository, RepoResult};
use uchimo_core::{PostId, ReactionRecord, ReactionType, UserId};

use crate::mappers::map_rows;
use crate::models::ReactionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn exists(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reactions
                WHERE post_id = $1 AND user_id = $2 AND reaction_type = $3
            )
            "#,
        )
        .bind(post_id.as_str())
        .bind(user_id.as_str())
        .bind(reaction_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn create(&self, record: &ReactionRecord) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO reactions (post_id, user_id, reaction_type, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (post_id, user_id, reaction_type) DO NOTHING
            "#,
        )
        .bind(record.post_id.as_str())
        .bind(record.user_id.as_str())
        .bind(record.reaction_type.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM reactions WHERE post_id = $1 AND user_id = $2 AND reaction_type = $3
            "#,
        )
        .bind(post_id.as_str())
        .bind(user_id.as_str())
        .bind(reaction_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, post_ids), fields(posts = post_ids.len()))]
    async fn find_by_user_for_posts(
        &self,
        user_id: &UserId,
        post_ids: &[PostId],
    ) -> RepoResult<Vec<ReactionRecord>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<&str> = post_ids.iter().map(PostId::as_str).collect();

        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT post_id, user_id, reaction_type, created_at
            FROM reactions
            WHERE user_id = $1 AND post_id = ANY($2)
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self))]
    async fn count(&self, post_id: &PostId, reaction_type: ReactionType) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reactions WHERE post_id = $1 AND reaction_type = $2
            "#,
        )
        .bind(post_id.as_str())
        .bind(reaction_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

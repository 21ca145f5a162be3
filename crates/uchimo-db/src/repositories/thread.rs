//! PostgreSQL implementation of ThreadRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use uchimo_core::traits::{RepoResult, ThreadQuery, ThreadRepository, ThreadSort};
use uchimo_core::{DomainError, Thread, ThreadId};

use crate::mappers::map_rows;
use crate::models::ThreadModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ThreadRepository
#[derive(Clone)]
pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    /// Create a new PgThreadRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ThreadId) -> RepoResult<Option<Thread>> {
        let result = sqlx::query_as::<_, ThreadModel>(
            r#"
            SELECT id, slug, title, tags, post_count, created_at
            FROM threads
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Thread::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Thread>> {
        let result = sqlx::query_as::<_, ThreadModel>(
            r#"
            SELECT id, slug, title, tags, post_count, created_at
            FROM threads
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Thread::try_from).transpose()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[ThreadId]) -> RepoResult<Vec<Thread>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<&str> = ids.iter().map(ThreadId::as_str).collect();

        let results = sqlx::query_as::<_, ThreadModel>(
            r#"
            SELECT id, slug, title, tags, post_count, created_at
            FROM threads
            WHERE id = ANY($1)
            "#,
        )
        .bind(&raw[..])
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        // Preserve the caller's ordering
        let mut threads: Vec<Thread> = map_rows(results)?;
        threads.sort_by_key(|t| ids.iter().position(|id| *id == t.id));
        Ok(threads)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: ThreadQuery) -> RepoResult<Vec<Thread>> {
        let limit = query.clamped_limit();

        let results = match query.sort {
            ThreadSort::Newest => {
                sqlx::query_as::<_, ThreadModel>(
                    r#"
                    SELECT id, slug, title, tags, post_count, created_at
                    FROM threads
                    ORDER BY created_at DESC, id
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(query.offset)
                .fetch_all(&self.pool)
                .await
            }
            ThreadSort::MostPosts => {
                sqlx::query_as::<_, ThreadModel>(
                    r#"
                    SELECT id, slug, title, tags, post_count, created_at
                    FROM threads
                    ORDER BY post_count DESC, created_at DESC, id
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(query.offset)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        map_rows(results)
    }

    #[instrument(skip(self, thread), fields(thread_id = %thread.id, slug = %thread.slug))]
    async fn create(&self, thread: &Thread) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO threads (id, slug, title, tags, post_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(thread.id.as_str())
        .bind(&thread.slug)
        .bind(&thread.title)
        .bind(&thread.tags)
        .bind(thread.post_count)
        .bind(thread.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::SlugExists(thread.slug.clone())))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_post_count(&self, id: &ThreadId) -> RepoResult<i64> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE threads SET post_count = post_count + 1 WHERE id = $1 RETURNING post_count
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        value.ok_or_else(|| DomainError::ThreadNotFound(id.clone()))
    }
}

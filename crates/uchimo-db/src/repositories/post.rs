//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use uchimo_core::traits::{PostQuery, PostRepository, PostSort, RepoResult};
use uchimo_core::{DomainError, Post, PostId, ReactionType, ThreadId, UserId};

use crate::mappers::map_rows;
use crate::models::PostModel;

use super::error::map_db_error;

const POST_COLUMNS: &str =
    "id, thread_id, author_id, content, likes_uchimo, likes_gambarou, created_at";

/// ORDER BY clause for a post listing
fn order_by(sort: PostSort) -> &'static str {
    match sort {
        PostSort::New => "created_at DESC, id",
        PostSort::MostUchimo => "likes_uchimo DESC, created_at DESC, id",
        PostSort::MostGambarou => "likes_gambarou DESC, created_at DESC, id",
    }
}

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_where(
        &self,
        column: &'static str,
        value: &str,
        query: &PostQuery,
    ) -> RepoResult<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE {column} = $1 ORDER BY {} LIMIT $2 OFFSET $3",
            order_by(query.sort)
        );

        let results = sqlx::query_as::<_, PostModel>(&sql)
            .bind(value)
            .bind(query.clamped_limit())
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        map_rows(results)
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &PostId) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r#"
            SELECT id, thread_id, author_id, content, likes_uchimo, likes_gambarou, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Post::try_from).transpose()
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, thread_id, author_id, content, likes_uchimo, likes_gambarou, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id.as_str())
        .bind(post.thread_id.as_str())
        .bind(post.author_id.as_str())
        .bind(&post.content)
        .bind(post.likes_uchimo)
        .bind(post.likes_gambarou)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_reaction(
        &self,
        id: &PostId,
        reaction_type: ReactionType,
        delta: i64,
    ) -> RepoResult<i64> {
        // Single-statement read-modify-write; the row lock serializes
        // concurrent deltas on the same post. Never goes below zero.
        let sql = match reaction_type {
            ReactionType::Uchimo => {
                "UPDATE posts SET likes_uchimo = GREATEST(likes_uchimo + $2, 0) WHERE id = $1 RETURNING likes_uchimo"
            }
            ReactionType::Gambarou => {
                "UPDATE posts SET likes_gambarou = GREATEST(likes_gambarou + $2, 0) WHERE id = $1 RETURNING likes_gambarou"
            }
        };

        let value = sqlx::query_scalar::<_, i64>(sql)
            .bind(id.as_str())
            .bind(delta)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        value.ok_or_else(|| DomainError::PostNotFound(id.clone()))
    }

    #[instrument(skip(self))]
    async fn set_reaction_count(
        &self,
        id: &PostId,
        reaction_type: ReactionType,
        value: i64,
    ) -> RepoResult<()> {
        let sql = match reaction_type {
            ReactionType::Uchimo => "UPDATE posts SET likes_uchimo = $2 WHERE id = $1",
            ReactionType::Gambarou => "UPDATE posts SET likes_gambarou = $2 WHERE id = $1",
        };

        let result = sqlx::query(sql)
            .bind(id.as_str())
            .bind(value.max(0))
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id.clone()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_thread(&self, thread_id: &ThreadId, query: PostQuery) -> RepoResult<Vec<Post>> {
        self.find_where("thread_id", thread_id.as_str(), &query).await
    }

    #[instrument(skip(self))]
    async fn find_by_author(&self, author_id: &UserId, query: PostQuery) -> RepoResult<Vec<Post>> {
        self.find_where("author_id", author_id.as_str(), &query).await
    }

    #[instrument(skip(self))]
    async fn exists_since(
        &self,
        author_id: &UserId,
        thread_id: &ThreadId,
        since: DateTime<Utc>,
    ) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM posts
                WHERE author_id = $1 AND thread_id = $2 AND created_at >= $3
            )
            "#,
        )
        .bind(author_id.as_str())
        .bind(thread_id.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }
}

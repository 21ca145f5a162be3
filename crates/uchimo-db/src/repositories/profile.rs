//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use uchimo_core::traits::{ProfileRepository, RepoResult};
use uchimo_core::{Profile, UserId};

use crate::models::ProfileModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: &UserId) -> RepoResult<Option<Profile>> {
        let result = sqlx::query_as::<_, ProfileModel>(
            r#"
            SELECT user_id, display_name, bio, last_posted, created_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Profile::try_from).transpose()
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.user_id))]
    async fn upsert(&self, profile: &Profile) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, display_name, bio, last_posted, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET display_name = EXCLUDED.display_name, bio = EXCLUDED.bio
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .bind(profile.last_posted)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn touch_last_posted(&self, user_id: &UserId, at: DateTime<Utc>) -> RepoResult<()> {
        // Authors who never saved a profile still get a row, with an empty
        // display name so they keep showing as anonymous
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, display_name, bio, last_posted, created_at)
            VALUES ($1, '', '', $2, $2)
            ON CONFLICT (user_id) DO UPDATE SET last_posted = EXCLUDED.last_posted
            "#,
        )
        .bind(user_id.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

//! Favorite database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for favorites table
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteModel {
    pub user_id: String,
    pub thread_id: String,
    pub created_at: DateTime<Utc>,
}

//! Post database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: String,
    pub thread_id: String,
    pub author_id: String,
    pub content: String,
    pub likes_uchimo: i64,
    pub likes_gambarou: i64,
    pub created_at: DateTime<Utc>,
}

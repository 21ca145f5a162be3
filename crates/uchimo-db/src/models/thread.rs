//! Thread database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for threads table
#[derive(Debug, Clone, FromRow)]
pub struct ThreadModel {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
}

//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub post_id: String,
    pub user_id: String,
    pub reaction_type: String,
    pub created_at: DateTime<Utc>,
}

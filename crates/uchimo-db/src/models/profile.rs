//! Profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub user_id: String,
    pub display_name: String,
    pub bio: String,
    pub last_posted: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

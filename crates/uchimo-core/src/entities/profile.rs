//! Profile entity - public display data for a user

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// Name shown for authors that have not set up a profile
pub const ANONYMOUS_NAME: &str = "匿名";

/// Profile entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: String,
    pub bio: String,
    pub last_posted: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Maximum display name length in characters
    pub const MAX_DISPLAY_NAME_CHARS: usize = 20;
    /// Maximum bio length in characters
    pub const MAX_BIO_CHARS: usize = 200;

    pub fn new(user_id: UserId, display_name: String, bio: String) -> Self {
        Self {
            user_id,
            display_name,
            bio,
            last_posted: None,
            created_at: Utc::now(),
        }
    }

    /// Display name, falling back to the anonymous label when blank
    pub fn name_or_anonymous(&self) -> &str {
        if self.display_name.trim().is_empty() {
            ANONYMOUS_NAME
        } else {
            &self.display_name
        }
    }
}

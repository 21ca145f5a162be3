//! Favorite entity - a user's bookmark on a thread

use chrono::{DateTime, Utc};

use crate::value_objects::{ThreadId, UserId};

/// Favorite record, unique per (user, thread)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRecord {
    pub user_id: UserId,
    pub thread_id: ThreadId,
    pub created_at: DateTime<Utc>,
}

impl FavoriteRecord {
    pub fn new(user_id: UserId, thread_id: ThreadId) -> Self {
        Self {
            user_id,
            thread_id,
            created_at: Utc::now(),
        }
    }

    /// Deterministic document key, so a favorite can be written or removed
    /// without a lookup
    pub fn document_key(&self) -> String {
        favorite_key(&self.user_id, &self.thread_id)
    }
}

/// Document key for the favorite edge (user, thread)
#[inline]
pub fn favorite_key(user_id: &UserId, thread_id: &ThreadId) -> String {
    format!("{user_id}_{thread_id}")
}

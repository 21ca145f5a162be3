//! Post entity - a daily message inside a thread

use chrono::{DateTime, Utc};

use crate::value_objects::{PostId, ReactionType, ThreadId, UserId};

/// Post entity
///
/// `likes_uchimo` / `likes_gambarou` are cached aggregates. The reaction
/// records are the source of truth; the counters may drift after a partial
/// write failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub thread_id: ThreadId,
    pub author_id: UserId,
    pub content: String,
    pub likes_uchimo: i64,
    pub likes_gambarou: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Maximum content length in characters
    pub const MAX_CONTENT_CHARS: usize = 600;

    /// Create a new post with zeroed reaction counters
    pub fn new(id: PostId, thread_id: ThreadId, author_id: UserId, content: String) -> Self {
        Self {
            id,
            thread_id,
            author_id,
            content,
            likes_uchimo: 0,
            likes_gambarou: 0,
            created_at: Utc::now(),
        }
    }

    /// Current counter value for a reaction type
    #[inline]
    pub fn count(&self, reaction_type: ReactionType) -> i64 {
        match reaction_type {
            ReactionType::Uchimo => self.likes_uchimo,
            ReactionType::Gambarou => self.likes_gambarou,
        }
    }

    /// Mutable access to the counter for a reaction type
    pub fn count_mut(&mut self, reaction_type: ReactionType) -> &mut i64 {
        match reaction_type {
            ReactionType::Uchimo => &mut self.likes_uchimo,
            ReactionType::Gambarou => &mut self.likes_gambarou,
        }
    }

    /// Get a truncated preview of the content (for lists)
    pub fn preview(&self, max_chars: usize) -> String {
        if self.content.chars().count() <= max_chars {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_chars).collect();
            preview.push('…');
            preview
        }
    }
}

//! Reaction entity - one user's reaction of one type on one post

use chrono::{DateTime, Utc};

use crate::value_objects::{PostId, ReactionType, UserId};

/// Reaction record
///
/// At most one record exists per (post, user, type). Existence of the record
/// is the only source of truth for "user reacted"; records are never updated
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRecord {
    pub post_id: PostId,
    pub user_id: UserId,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
}

impl ReactionRecord {
    /// Create a new ReactionRecord stamped with the current time
    pub fn new(post_id: PostId, user_id: UserId, reaction_type: ReactionType) -> Self {
        Self {
            post_id,
            user_id,
            reaction_type,
            created_at: Utc::now(),
        }
    }

    /// Composite identity of this record
    pub fn key(&self) -> ReactionKey {
        ReactionKey {
            post_id: self.post_id.clone(),
            user_id: self.user_id.clone(),
            reaction_type: self.reaction_type,
        }
    }
}

/// Composite key (post, user, type)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionKey {
    pub post_id: PostId,
    pub user_id: UserId,
    pub reaction_type: ReactionType,
}

impl ReactionKey {
    pub fn new(post_id: PostId, user_id: UserId, reaction_type: ReactionType) -> Self {
        Self {
            post_id,
            user_id,
            reaction_type,
        }
    }
}

/// Both reaction counters of a post, as shown next to the buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionCounts {
    pub uchimo: i64,
    pub gambarou: i64,
}

impl ReactionCounts {
    pub fn new(uchimo: i64, gambarou: i64) -> Self {
        Self { uchimo, gambarou }
    }

    #[inline]
    pub fn get(&self, reaction_type: ReactionType) -> i64 {
        match reaction_type {
            ReactionType::Uchimo => self.uchimo,
            ReactionType::Gambarou => self.gambarou,
        }
    }

    pub fn set(&mut self, reaction_type: ReactionType, value: i64) {
        match reaction_type {
            ReactionType::Uchimo => self.uchimo = value,
            ReactionType::Gambarou => self.gambarou = value,
        }
    }
}

//! Response DTOs
//!
//! All response DTOs implement `Serialize`. Ids are serialized as plain
//! strings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uchimo_core::ReactionType;

// ============================================================================
// Common Response Types
// ============================================================================

/// One page of a listing
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Offset of the next page, absent on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<i64>,
}

impl<T> Page<T> {
    /// A short page means there is nothing after it
    pub fn new(data: Vec<T>, offset: i64, limit: i64) -> Self {
        let len = i64::try_from(data.len()).unwrap_or(i64::MAX);
        let next_offset = (len >= limit).then(|| offset + len);
        Self { data, next_offset }
    }
}

// ============================================================================
// Toggle Responses
// ============================================================================

/// Result of a reaction toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionToggle {
    /// Counter value after the toggle
    pub new_count: i64,
    /// Whether the user's reaction exists after the toggle
    pub new_is_reacted: bool,
}

/// Result of a favorite toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteToggle {
    pub new_is_favorited: bool,
}

// ============================================================================
// Post / Thread / Profile Responses
// ============================================================================

/// Post with its author's display name
#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub thread_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub likes_uchimo: i64,
    pub likes_gambarou: i64,
    pub created_at: DateTime<Utc>,
}

/// Thread response
#[derive(Debug, Clone, Serialize)]
pub struct ThreadResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Public profile
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub display_name: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_posted: Option<DateTime<Utc>>,
}

// ============================================================================
// Maintenance Responses
// ============================================================================

/// Stored counter versus existing records for one reaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DriftEntry {
    pub reaction_type: ReactionType,
    /// Counter value found on the post
    pub stored: i64,
    /// Number of reaction records
    pub actual: i64,
}

impl DriftEntry {
    pub fn drift(&self) -> i64 {
        self.stored - self.actual
    }
}

/// Outcome of recounting a post's reaction counters
#[derive(Debug, Clone, Serialize)]
pub struct CounterDrift {
    pub post_id: String,
    pub entries: Vec<DriftEntry>,
}

impl CounterDrift {
    /// Whether every counter already matched its records
    pub fn is_consistent(&self) -> bool {
        self.entries.iter().all(|e| e.drift() == 0)
    }

    pub fn get(&self, reaction_type: ReactionType) -> Option<&DriftEntry> {
        self.entries.iter().find(|e| e.reaction_type == reaction_type)
    }
}

/// Outcome of seeding the starter threads
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    /// Slugs of threads created by this run
    pub created: Vec<String>,
    /// Threads that already existed
    pub skipped: usize,
}

//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs from the document store; the store
//! adapters in `uchimo-db` provide it. Every operation is a separate round
//! trip, so nothing here is atomic across calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{FavoriteRecord, Post, Profile, ReactionRecord, Thread};
use crate::error::DomainError;
use crate::value_objects::{PostId, ReactionType, ThreadId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Strongly consistent point check for a (post, user, type) record
    async fn exists(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> RepoResult<bool>;

    /// Create a record; returns `false` if one already existed for the tuple
    async fn create(&self, record: &ReactionRecord) -> RepoResult<bool>;

    /// Delete a record; returns `false` if there was nothing to delete
    async fn delete(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> RepoResult<bool>;

    /// All of a user's reactions on the given posts
    async fn find_by_user_for_posts(
        &self,
        user_id: &UserId,
        post_ids: &[PostId],
    ) -> RepoResult<Vec<ReactionRecord>>;

    /// Number of existing records of a type on a post
    async fn count(&self, post_id: &PostId, reaction_type: ReactionType) -> RepoResult<i64>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Sort order for post listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    /// Newest first
    #[default]
    New,
    /// Most "uchimo" reactions first, then newest
    MostUchimo,
    /// Most "gambarou" reactions first, then newest
    MostGambarou,
}

impl PostSort {
    /// Counter used as the primary sort key, if any
    pub fn reaction_type(self) -> Option<ReactionType> {
        match self {
            Self::New => None,
            Self::MostUchimo => Some(ReactionType::Uchimo),
            Self::MostGambarou => Some(ReactionType::Gambarou),
        }
    }
}

/// Pagination options for post queries
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub sort: PostSort,
    pub limit: i64,
    pub offset: i64,
}

impl PostQuery {
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(sort: PostSort, limit: i64) -> Self {
        Self {
            sort,
            limit,
            offset: 0,
        }
    }

    /// Continue after `offset` rows
    pub fn after(mut self, offset: i64) -> Self {
        self.offset = offset.max(0);
        self
    }

    /// Limit clamped to 1..=100
    #[inline]
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Point read of a post, including its current counters
    async fn find_by_id(&self, id: &PostId) -> RepoResult<Option<Post>>;

    /// Create a new post
    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Atomically add `delta` to a reaction counter; returns the new value
    async fn increment_reaction(
        &self,
        id: &PostId,
        reaction_type: ReactionType,
        delta: i64,
    ) -> RepoResult<i64>;

    /// Overwrite a reaction counter (counter repair)
    async fn set_reaction_count(
        &self,
        id: &PostId,
        reaction_type: ReactionType,
        value: i64,
    ) -> RepoResult<()>;

    /// Posts in a thread
    async fn find_by_thread(&self, thread_id: &ThreadId, query: PostQuery)
        -> RepoResult<Vec<Post>>;

    /// Posts written by a user
    async fn find_by_author(&self, author_id: &UserId, query: PostQuery) -> RepoResult<Vec<Post>>;

    /// Whether the user posted to the thread at or after `since`
    async fn exists_since(
        &self,
        author_id: &UserId,
        thread_id: &ThreadId,
        since: DateTime<Utc>,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Thread Repository
// ============================================================================

/// Sort order for thread listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreadSort {
    #[default]
    Newest,
    MostPosts,
}

/// Pagination options for thread queries
#[derive(Debug, Clone, Default)]
pub struct ThreadQuery {
    pub sort: ThreadSort,
    pub limit: i64,
    pub offset: i64,
}

impl ThreadQuery {
    pub fn new(sort: ThreadSort, limit: i64) -> Self {
        Self {
            sort,
            limit,
            offset: 0,
        }
    }

    pub fn after(mut self, offset: i64) -> Self {
        self.offset = offset.max(0);
        self
    }

    #[inline]
    pub fn clamped_limit(&self) -> i64 {
        self.limit.clamp(1, PostQuery::MAX_LIMIT)
    }
}

#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Find thread by ID
    async fn find_by_id(&self, id: &ThreadId) -> RepoResult<Option<Thread>>;

    /// Find thread by slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Thread>>;

    /// Fetch several threads; missing ids are skipped
    async fn find_by_ids(&self, ids: &[ThreadId]) -> RepoResult<Vec<Thread>>;

    /// List threads
    async fn list(&self, query: ThreadQuery) -> RepoResult<Vec<Thread>>;

    /// Create a new thread
    async fn create(&self, thread: &Thread) -> RepoResult<()>;

    /// Atomically bump the post counter
    async fn increment_post_count(&self, id: &ThreadId) -> RepoResult<i64>;
}

// ============================================================================
// Favorite Repository
// ============================================================================

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Check whether the favorite edge exists
    async fn exists(&self, user_id: &UserId, thread_id: &ThreadId) -> RepoResult<bool>;

    /// Write the favorite edge (idempotent, keyed by user and thread)
    async fn put(&self, record: &FavoriteRecord) -> RepoResult<()>;

    /// Remove the favorite edge; no-op if absent
    async fn delete(&self, user_id: &UserId, thread_id: &ThreadId) -> RepoResult<bool>;

    /// A user's favorites, newest first
    async fn find_by_user(&self, user_id: &UserId, limit: i64) -> RepoResult<Vec<FavoriteRecord>>;

    /// Every thread the user has favorited, without a page limit
    async fn thread_ids_by_user(&self, user_id: &UserId) -> RepoResult<Vec<ThreadId>>;
}

// ============================================================================
// Profile Repository
// ============================================================================

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a user's profile
    async fn find(&self, user_id: &UserId) -> RepoResult<Option<Profile>>;

    /// Create or replace a profile
    async fn upsert(&self, profile: &Profile) -> RepoResult<()>;

    /// Record the time of the user's latest post
    async fn touch_last_posted(&self, user_id: &UserId, at: DateTime<Utc>) -> RepoResult<()>;
}

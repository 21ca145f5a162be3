//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use uchimo_core::{Post, Profile, Thread};

use super::responses::{PostResponse, ProfileResponse, ThreadResponse};

// ============================================================================
// Post Mappers
// ============================================================================

impl PostResponse {
    /// Attach the author's resolved display name
    pub fn from_post(post: &Post, author_name: impl Into<String>) -> Self {
        Self {
            id: post.id.to_string(),
            thread_id: post.thread_id.to_string(),
            author_id: post.author_id.to_string(),
            author_name: author_name.into(),
            content: post.content.clone(),
            likes_uchimo: post.likes_uchimo,
            likes_gambarou: post.likes_gambarou,
            created_at: post.created_at,
        }
    }
}

// ============================================================================
// Thread Mappers
// ============================================================================

impl From<&Thread> for ThreadResponse {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id.to_string(),
            slug: thread.slug.clone(),
            title: thread.title.clone(),
            tags: thread.tags.clone(),
            post_count: thread.post_count,
            created_at: thread.created_at,
        }
    }
}

impl From<Thread> for ThreadResponse {
    fn from(thread: Thread) -> Self {
        Self::from(&thread)
    }
}

// ============================================================================
// Profile Mappers
// ============================================================================

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            display_name: profile.name_or_anonymous().to_string(),
            bio: profile.bio.clone(),
            last_posted: profile.last_posted,
        }
    }
}

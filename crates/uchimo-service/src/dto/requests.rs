//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Reaction and favorite toggles take no request body: their inputs are ids
//! and a `ReactionType`, which are already typed.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 600, message = "Content must be 1-600 characters"))]
    pub content: String,
}

// ============================================================================
// Thread Requests
// ============================================================================

/// Create thread request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateThreadRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 tags"))]
    pub tags: Vec<String>,
}

// ============================================================================
// Profile Requests
// ============================================================================

/// Save profile request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveProfileRequest {
    #[validate(length(max = 20, message = "Display name must be at most 20 characters"))]
    pub display_name: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Bio must be at most 200 characters"))]
    pub bio: String,
}

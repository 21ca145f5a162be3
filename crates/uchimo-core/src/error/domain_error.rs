//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{PostId, ThreadId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Thread not found: {0}")]
    ThreadNotFound(ThreadId),

    #[error("Thread not found for slug: {0}")]
    ThreadSlugNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already posted to this thread today")]
    AlreadyPostedToday,

    #[error("Thread slug already exists: {0}")]
    SlugExists(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Permission denied by store: {0}")]
    PermissionDenied(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for client responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::ThreadNotFound(_) | Self::ThreadSlugNotFound(_) => "UNKNOWN_THREAD",
            Self::ProfileNotFound(_) => "UNKNOWN_PROFILE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",

            // Conflict
            Self::AlreadyPostedToday => "ALREADY_POSTED_TODAY",
            Self::SlugExists(_) => "SLUG_EXISTS",

            // Infrastructure
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::PermissionDenied(_) => "STORE_PERMISSION_DENIED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PostNotFound(_)
                | Self::ThreadNotFound(_)
                | Self::ThreadSlugNotFound(_)
                | Self::ProfileNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::EmptyContent | Self::ContentTooLong { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyPostedToday | Self::SlugExists(_))
    }

    /// Check if this error came from the backing store rather than domain rules
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_)
                | Self::PermissionDenied(_)
                | Self::DatabaseError(_)
                | Self::InternalError(_)
        )
    }
}

//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use std::fmt;
use uchimo_common::AppError;
use uchimo_core::DomainError;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or store failure outside the toggle paths
    Domain(DomainError),

    /// Application error (auth, config, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// No signed-in user
    Unauthenticated,

    /// Validation error
    Validation(String),

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// A reaction toggle did not complete; the caller rolls back its
    /// optimistic state
    ReactionToggleFailed,

    /// A favorite toggle did not complete
    FavoriteToggleFailed,

    /// Another toggle on the same item is still running
    ToggleInProgress,

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Unauthenticated => write!(f, "Sign-in required"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::ReactionToggleFailed => write!(f, "Reaction could not be updated"),
            Self::FavoriteToggleFailed => write!(f, "Favorite could not be updated"),
            Self::ToggleInProgress => {
                write!(f, "Another update for this item is still in progress")
            }
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this is one of the toggle umbrella errors
    pub fn is_toggle_failure(&self) -> bool {
        matches!(
            self,
            Self::ReactionToggleFailed | Self::FavoriteToggleFailed | Self::ToggleInProgress
        )
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::Unauthenticated => 401,
            Self::Validation(_) => 400,
            Self::Conflict(_) | Self::ToggleInProgress => 409,
            Self::ReactionToggleFailed | Self::FavoriteToggleFailed | Self::Internal(_) => 500,
        }
    }

    /// Get the error code for client responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthenticated => "MISSING_AUTH",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ReactionToggleFailed => "REACTION_TOGGLE_FAILED",
            Self::FavoriteToggleFailed => "FAVORITE_TOGGLE_FAILED",
            Self::ToggleInProgress => "TOGGLE_IN_PROGRESS",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::MissingAuth => Self::Unauthenticated,
            other => Self::App(other),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Unauthenticated => AppError::MissingAuth,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::ReactionToggleFailed => AppError::ReactionToggleFailed,
            ServiceError::FavoriteToggleFailed => AppError::FavoriteToggleFailed,
            ServiceError::ToggleInProgress => AppError::ToggleInProgress,
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Thread", "abc");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Thread not found: abc"));
    }

    #[test]
    fn test_toggle_errors() {
        assert_eq!(ServiceError::ReactionToggleFailed.status_code(), 500);
        assert_eq!(
            ServiceError::FavoriteToggleFailed.error_code(),
            "FAVORITE_TOGGLE_FAILED"
        );
        assert_eq!(ServiceError::ToggleInProgress.status_code(), 409);
        assert!(ServiceError::ToggleInProgress.is_toggle_failure());
        assert!(!ServiceError::Unauthenticated.is_toggle_failure());
    }

    #[test]
    fn test_missing_auth_becomes_unauthenticated() {
        let err = ServiceError::from(AppError::MissingAuth);
        assert!(matches!(err, ServiceError::Unauthenticated));
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_domain_conflict() {
        let err = ServiceError::from(DomainError::AlreadyPostedToday);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "ALREADY_POSTED_TODAY");
    }

    #[test]
    fn test_convert_to_app_error() {
        let app_err: AppError = ServiceError::ReactionToggleFailed.into();
        assert!(matches!(app_err, AppError::ReactionToggleFailed));
        assert!(app_err.is_retryable());

        let app_err: AppError = ServiceError::not_found("Post", "p1").into();
        assert_eq!(app_err.status_code(), 404);
    }
}

//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use uchimo_core::DomainError;

/// Convert SQLx error to DomainError
///
/// Connection-level failures are reported as the store being unavailable so
/// the toggle services can treat them like any other transient outage.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match e {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
            DomainError::StoreUnavailable(e.to_string())
        }
        SqlxError::Database(ref db_err) if db_err.code().as_deref() == Some("42501") => {
            DomainError::PermissionDenied(e.to_string())
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

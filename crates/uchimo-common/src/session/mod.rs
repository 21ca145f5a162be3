//! Explicit authentication session
//!
//! Sign-in itself is handled by the external auth provider. What the rest of
//! the application sees is a `Session` value that is passed into every call
//! needing the current user, never read from global state.

use uchimo_core::UserId;

use crate::error::AppError;

/// The signed-in user, as vouched for by the auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    email: Option<String>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[inline]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Auth state as observed by the client while the provider resolves it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// The provider has not reported yet
    #[default]
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            _ => None,
        }
    }

    /// Session for a protected screen; signed-out and loading users are
    /// turned away
    pub fn require(&self) -> Result<&Session, AppError> {
        self.session().ok_or(AppError::MissingAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accessors() {
        let session = Session::new(UserId::parse("u1").unwrap()).with_email("a@example.com");
        assert_eq!(session.user_id().as_str(), "u1");
        assert_eq!(session.email(), Some("a@example.com"));
    }

    #[test]
    fn test_require_session() {
        assert!(matches!(AuthState::Loading.require(), Err(AppError::MissingAuth)));
        assert!(matches!(AuthState::SignedOut.require(), Err(AppError::MissingAuth)));

        let state = AuthState::SignedIn(Session::new(UserId::parse("u1").unwrap()));
        assert_eq!(state.require().unwrap().user_id().as_str(), "u1");
    }

    #[test]
    fn test_default_is_loading() {
        assert!(AuthState::default().is_loading());
    }
}

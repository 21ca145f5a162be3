//! Document identifiers
//!
//! Users, posts, and threads are addressed by opaque string ids handed out by
//! the document store (or, for users, by the auth provider). Newly created
//! documents get a 20-character alphanumeric auto id.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of generated document ids
pub const AUTO_ID_LEN: usize = 20;

/// Generate a random alphanumeric document id
pub fn generate_auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

/// Error when parsing an id from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("document id must not be empty")]
    Empty,

    #[error("document id must not contain '/'")]
    ContainsSlash,
}

fn check_id(raw: &str) -> Result<(), IdParseError> {
    if raw.trim().is_empty() {
        return Err(IdParseError::Empty);
    }
    if raw.contains('/') {
        return Err(IdParseError::ContainsSlash);
    }
    Ok(())
}

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id, rejecting empty values and path separators
            pub fn parse(raw: impl Into<String>) -> Result<Self, IdParseError> {
                let raw = raw.into();
                check_id(&raw)?;
                Ok(Self(raw))
            }

            /// Allocate a fresh auto id
            pub fn generate() -> Self {
                Self(generate_auto_id())
            }

            /// Borrow the raw id
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

document_id!(
    /// Id of an authenticated user (assigned by the auth provider)
    UserId
);

document_id!(
    /// Id of a post document
    PostId
);

document_id!(
    /// Id of a discussion thread document
    ThreadId
);

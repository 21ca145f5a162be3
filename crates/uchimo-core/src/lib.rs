//! # uchimo-core
//!
//! Domain layer containing entities, identifiers, and repository traits.
//! This crate has zero dependencies on infrastructure (database, runtime, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    favorite_key, slugify, FavoriteRecord, Post, Profile, ReactionCounts, ReactionKey,
    ReactionRecord, Thread, ANONYMOUS_NAME,
};
pub use error::DomainError;
pub use traits::{
    FavoriteRepository, PostQuery, PostRepository, PostSort, ProfileRepository,
    ReactionRepository, RepoResult, ThreadQuery, ThreadRepository, ThreadSort,
};
pub use value_objects::{IdParseError, PostId, ReactionType, ThreadId, UserId};

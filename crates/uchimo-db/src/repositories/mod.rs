//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in uchimo-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod favorite;
mod post;
mod profile;
mod reaction;
mod thread;

pub use error::{map_db_error, map_unique_violation};
pub use favorite::PgFavoriteRepository;
pub use post::PgPostRepository;
pub use profile::PgProfileRepository;
pub use reaction::PgReactionRepository;
pub use thread::PgThreadRepository;

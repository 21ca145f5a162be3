//! Domain entities - core business objects

mod favorite;
mod post;
mod profile;
mod reaction;
mod thread;

pub use favorite::{favorite_key, FavoriteRecord};
pub use post::Post;
pub use profile::{Profile, ANONYMOUS_NAME};
pub use reaction::{ReactionCounts, ReactionKey, ReactionRecord};
pub use thread::{slugify, Thread};

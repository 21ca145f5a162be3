//! Database models - SQLx-compatible structs for PostgreSQL tables

mod favorite;
mod post;
mod profile;
mod reaction;
mod thread;

pub use favorite::FavoriteModel;
pub use post::PostModel;
pub use profile::ProfileModel;
pub use reaction::ReactionModel;
pub use thread::ThreadModel;

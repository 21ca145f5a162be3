//! Repository traits (ports)

mod repositories;

pub use repositories::{
    FavoriteRepository, PostQuery, PostRepository, PostSort, ProfileRepository,
    ReactionRepository, RepoResult, ThreadQuery, ThreadRepository, ThreadSort,
};

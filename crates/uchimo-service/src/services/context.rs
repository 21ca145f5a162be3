//! Service context - dependency container for services
//!
//! Holds all repositories, the toggle guard, and the settings services read.

use std::sync::Arc;

use uchimo_common::{AppConfig, FeedConfig, PostingConfig, ToggleConfig};
use uchimo_core::traits::{
    FavoriteRepository, PostRepository, ProfileRepository, ReactionRepository, ThreadRepository,
};
use uchimo_db::{
    MemoryStore, PgFavoriteRepository, PgPool, PgPostRepository, PgProfileRepository,
    PgReactionRepository, PgThreadRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::guard::ToggleGuard;

/// Service context containing all dependencies
///
/// Cheap to clone; every service borrows it.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    reaction_repo: Arc<dyn ReactionRepository>,
    post_repo: Arc<dyn PostRepository>,
    thread_repo: Arc<dyn ThreadRepository>,
    favorite_repo: Arc<dyn FavoriteRepository>,
    profile_repo: Arc<dyn ProfileRepository>,

    // Toggle serialization
    guard: Arc<ToggleGuard>,

    // Settings
    toggle: ToggleConfig,
    posting: PostingConfig,
    feed: FeedConfig,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the thread repository
    pub fn thread_repo(&self) -> &dyn ThreadRepository {
        self.thread_repo.as_ref()
    }

    /// Get the favorite repository
    pub fn favorite_repo(&self) -> &dyn FavoriteRepository {
        self.favorite_repo.as_ref()
    }

    /// Get the profile repository
    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    // === Toggle guard ===

    pub fn guard(&self) -> &ToggleGuard {
        self.guard.as_ref()
    }

    // === Settings ===

    pub fn toggle_config(&self) -> &ToggleConfig {
        &self.toggle
    }

    pub fn posting_config(&self) -> &PostingConfig {
        &self.posting
    }

    pub fn feed_config(&self) -> &FeedConfig {
        &self.feed
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("guard", &self.guard)
            .field("toggle", &self.toggle)
            .field("posting", &self.posting)
            .field("feed", &self.feed)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    thread_repo: Option<Arc<dyn ThreadRepository>>,
    favorite_repo: Option<Arc<dyn FavoriteRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    toggle: ToggleConfig,
    posting: PostingConfig,
    feed: FeedConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take toggle, posting, and feed settings from the loaded configuration
    pub fn config(mut self, config: &AppConfig) -> Self {
        self.toggle = config.toggle.clone();
        self.posting = config.posting.clone();
        self.feed = config.feed.clone();
        self
    }

    /// Use PostgreSQL repositories over `pool` for every port
    pub fn postgres(self, pool: &PgPool) -> Self {
        self.reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
            .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
            .thread_repo(Arc::new(PgThreadRepository::new(pool.clone())))
            .favorite_repo(Arc::new(PgFavoriteRepository::new(pool.clone())))
            .profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
    }

    /// Use one in-memory store for every port
    pub fn memory(self, store: &MemoryStore) -> Self {
        self.reaction_repo(Arc::new(store.clone()))
            .post_repo(Arc::new(store.clone()))
            .thread_repo(Arc::new(store.clone()))
            .favorite_repo(Arc::new(store.clone()))
            .profile_repo(Arc::new(store.clone()))
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn thread_repo(mut self, repo: Arc<dyn ThreadRepository>) -> Self {
        self.thread_repo = Some(repo);
        self
    }

    pub fn favorite_repo(mut self, repo: Arc<dyn FavoriteRepository>) -> Self {
        self.favorite_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn toggle_config(mut self, toggle: ToggleConfig) -> Self {
        self.toggle = toggle;
        self
    }

    pub fn posting_config(mut self, posting: PostingConfig) -> Self {
        self.posting = posting;
        self
    }

    pub fn feed_config(mut self, feed: FeedConfig) -> Self {
        self.feed = feed;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let guard = Arc::new(ToggleGuard::new(self.toggle.guard));

        Ok(ServiceContext {
            reaction_repo: self
                .reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            thread_repo: self
                .thread_repo
                .ok_or_else(|| ServiceError::validation("thread_repo is required"))?,
            favorite_repo: self
                .favorite_repo
                .ok_or_else(|| ServiceError::validation("favorite_repo is required"))?,
            profile_repo: self
                .profile_repo
                .ok_or_else(|| ServiceError::validation("profile_repo is required"))?,
            guard,
            toggle: self.toggle,
            posting: self.posting,
            feed: self.feed,
        })
    }
}

//! In-process document store
//!
//! Implements every repository port over concurrent maps. Each call is its
//! own suspension point: with yielding enabled the call hands control back
//! to the runtime before touching any data, so interleavings that a remote
//! store would produce show up on a single-threaded runtime too.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use tracing::trace;

use uchimo_core::traits::{
    FavoriteRepository, PostQuery, PostRepository, PostSort, ProfileRepository,
    ReactionRepository, RepoResult, ThreadQuery, ThreadRepository, ThreadSort,
};
use uchimo_core::{
    favorite_key, DomainError, FavoriteRecord, Post, PostId, Profile, ReactionKey,
    ReactionRecord, ReactionType, Thread, ThreadId, UserId,
};

use super::fault::{FaultPlan, StoreOp};

#[derive(Default)]
struct Inner {
    posts: DashMap<PostId, Post>,
    threads: DashMap<ThreadId, Thread>,
    reactions: DashMap<ReactionKey, ReactionRecord>,
    favorites: DashMap<String, FavoriteRecord>,
    profiles: DashMap<UserId, Profile>,
    faults: Mutex<FaultPlan>,
    calls: DashMap<StoreOp, usize>,
    yielding: AtomicBool,
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that yields to the runtime at every call
    pub fn yielding() -> Self {
        let store = Self::new();
        store.set_yielding(true);
        store
    }

    pub fn set_yielding(&self, enabled: bool) {
        self.inner.yielding.store(enabled, Ordering::Relaxed);
    }

    /// Planned failures; edit in place
    pub fn faults(&self) -> MutexGuard<'_, FaultPlan> {
        self.inner.faults.lock()
    }

    /// How many times `op` has been called
    pub fn calls(&self, op: StoreOp) -> usize {
        self.inner.calls.get(&op).map_or(0, |n| *n)
    }

    // Direct access for fixtures and assertions; these bypass faults and
    // yields.

    pub fn insert_post(&self, post: Post) {
        self.inner.posts.insert(post.id.clone(), post);
    }

    pub fn insert_thread(&self, thread: Thread) {
        self.inner.threads.insert(thread.id.clone(), thread);
    }

    pub fn insert_reaction(&self, record: ReactionRecord) {
        self.inner.reactions.insert(record.key(), record);
    }

    pub fn post(&self, id: &PostId) -> Option<Post> {
        self.inner.posts.get(id).map(|p| p.clone())
    }

    pub fn thread(&self, id: &ThreadId) -> Option<Thread> {
        self.inner.threads.get(id).map(|t| t.clone())
    }

    pub fn profile(&self, user_id: &UserId) -> Option<Profile> {
        self.inner.profiles.get(user_id).map(|p| p.clone())
    }

    /// Number of reaction records of a type on a post
    pub fn record_count(&self, post_id: &PostId, reaction_type: ReactionType) -> i64 {
        let n = self
            .inner
            .reactions
            .iter()
            .filter(|r| r.key().post_id == *post_id && r.key().reaction_type == reaction_type)
            .count();
        i64::try_from(n).unwrap_or(i64::MAX)
    }

    pub fn has_reaction(&self, key: &ReactionKey) -> bool {
        self.inner.reactions.contains_key(key)
    }

    pub fn has_favorite(&self, user_id: &UserId, thread_id: &ThreadId) -> bool {
        self.inner
            .favorites
            .contains_key(&favorite_key(user_id, thread_id))
    }

    async fn enter(&self, op: StoreOp) -> RepoResult<()> {
        *self.inner.calls.entry(op).or_insert(0) += 1;

        if self.inner.yielding.load(Ordering::Relaxed) {
            tokio::task::yield_now().await;
        }

        let fault = self.inner.faults.lock().trip(op);
        match fault {
            Some(err) => {
                trace!(%op, "Injected store failure");
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn list_posts<F>(&self, filter: F, query: &PostQuery) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        let mut posts: Vec<Post> = self
            .inner
            .posts
            .iter()
            .filter(|p| filter(p.value()))
            .map(|p| p.value().clone())
            .collect();

        match query.sort {
            PostSort::New => posts.sort_by_key(|p| Reverse(p.created_at)),
            PostSort::MostUchimo | PostSort::MostGambarou => {
                let rt = query.sort.reaction_type().unwrap_or(ReactionType::Uchimo);
                posts.sort_by_key(|p| (Reverse(p.count(rt)), Reverse(p.created_at)));
            }
        }

        paginate(posts, query.offset, query.clamped_limit())
    }
}

fn paginate<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(0);
    let limit = usize::try_from(limit).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn exists(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> RepoResult<bool> {
        self.enter(StoreOp::ReactionExists).await?;
        let key = ReactionKey::new(post_id.clone(), user_id.clone(), reaction_type);
        Ok(self.inner.reactions.contains_key(&key))
    }

    async fn create(&self, record: &ReactionRecord) -> RepoResult<bool> {
        self.enter(StoreOp::ReactionCreate).await?;
        let mut created = false;
        self.inner.reactions.entry(record.key()).or_insert_with(|| {
            created = true;
            record.clone()
        });
        Ok(created)
    }

    async fn delete(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> RepoResult<bool> {
        self.enter(StoreOp::ReactionDelete).await?;
        let key = ReactionKey::new(post_id.clone(), user_id.clone(), reaction_type);
        Ok(self.inner.reactions.remove(&key).is_some())
    }

    async fn find_by_user_for_posts(
        &self,
        user_id: &UserId,
        post_ids: &[PostId],
    ) -> RepoResult<Vec<ReactionRecord>> {
        self.enter(StoreOp::ReactionFindForPosts).await?;
        let mut records: Vec<ReactionRecord> = self
            .inner
            .reactions
            .iter()
            .filter(|r| r.user_id == *user_id && post_ids.contains(&r.post_id))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    async fn count(&self, post_id: &PostId, reaction_type: ReactionType) -> RepoResult<i64> {
        self.enter(StoreOp::ReactionCount).await?;
        Ok(self.record_count(post_id, reaction_type))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_by_id(&self, id: &PostId) -> RepoResult<Option<Post>> {
        self.enter(StoreOp::PostFind).await?;
        Ok(self.post(id))
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.enter(StoreOp::PostCreate).await?;
        self.insert_post(post.clone());
        Ok(())
    }

    async fn increment_reaction(
        &self,
        id: &PostId,
        reaction_type: ReactionType,
        delta: i64,
    ) -> RepoResult<i64> {
        self.enter(StoreOp::PostIncrement).await?;
        let mut post = self
            .inner
            .posts
            .get_mut(id)
            .ok_or_else(|| DomainError::PostNotFound(id.clone()))?;
        let counter = post.count_mut(reaction_type);
        *counter = (*counter + delta).max(0);
        Ok(*counter)
    }

    async fn set_reaction_count(
        &self,
        id: &PostId,
        reaction_type: ReactionType,
        value: i64,
    ) -> RepoResult<()> {
        self.enter(StoreOp::PostSetCount).await?;
        let mut post = self
            .inner
            .posts
            .get_mut(id)
            .ok_or_else(|| DomainError::PostNotFound(id.clone()))?;
        *post.count_mut(reaction_type) = value.max(0);
        Ok(())
    }

    async fn find_by_thread(&self, thread_id: &ThreadId, query: PostQuery) -> RepoResult<Vec<Post>> {
        self.enter(StoreOp::PostList).await?;
        Ok(self.list_posts(|p| p.thread_id == *thread_id, &query))
    }

    async fn find_by_author(&self, author_id: &UserId, query: PostQuery) -> RepoResult<Vec<Post>> {
        self.enter(StoreOp::PostList).await?;
        Ok(self.list_posts(|p| p.author_id == *author_id, &query))
    }

    async fn exists_since(
        &self,
        author_id: &UserId,
        thread_id: &ThreadId,
        since: DateTime<Utc>,
    ) -> RepoResult<bool> {
        self.enter(StoreOp::PostExistsSince).await?;
        Ok(self.inner.posts.iter().any(|p| {
            p.author_id == *author_id && p.thread_id == *thread_id && p.created_at >= since
        }))
    }
}

#[async_trait]
impl ThreadRepository for MemoryStore {
    async fn find_by_id(&self, id: &ThreadId) -> RepoResult<Option<Thread>> {
        self.enter(StoreOp::ThreadFind).await?;
        Ok(self.thread(id))
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Thread>> {
        self.enter(StoreOp::ThreadFind).await?;
        Ok(self
            .inner
            .threads
            .iter()
            .find(|t| t.slug == slug)
            .map(|t| t.value().clone()))
    }

    async fn find_by_ids(&self, ids: &[ThreadId]) -> RepoResult<Vec<Thread>> {
        self.enter(StoreOp::ThreadFind).await?;
        Ok(ids.iter().filter_map(|id| self.thread(id)).collect())
    }

    async fn list(&self, query: ThreadQuery) -> RepoResult<Vec<Thread>> {
        self.enter(StoreOp::ThreadList).await?;
        let mut threads: Vec<Thread> = self.inner.threads.iter().map(|t| t.value().clone()).collect();

        match query.sort {
            ThreadSort::Newest => threads.sort_by_key(|t| Reverse(t.created_at)),
            ThreadSort::MostPosts => {
                threads.sort_by_key(|t| (Reverse(t.post_count), Reverse(t.created_at)));
            }
        }

        Ok(paginate(threads, query.offset, query.clamped_limit()))
    }

    async fn create(&self, thread: &Thread) -> RepoResult<()> {
        self.enter(StoreOp::ThreadCreate).await?;
        if self.inner.threads.iter().any(|t| t.slug == thread.slug) {
            return Err(DomainError::SlugExists(thread.slug.clone()));
        }
        self.insert_thread(thread.clone());
        Ok(())
    }

    async fn increment_post_count(&self, id: &ThreadId) -> RepoResult<i64> {
        self.enter(StoreOp::ThreadIncrement).await?;
        let mut thread = self
            .inner
            .threads
            .get_mut(id)
            .ok_or_else(|| DomainError::ThreadNotFound(id.clone()))?;
        thread.post_count += 1;
        Ok(thread.post_count)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn exists(&self, user_id: &UserId, thread_id: &ThreadId) -> RepoResult<bool> {
        self.enter(StoreOp::FavoriteExists).await?;
        Ok(self.has_favorite(user_id, thread_id))
    }

    async fn put(&self, record: &FavoriteRecord) -> RepoResult<()> {
        self.enter(StoreOp::FavoritePut).await?;
        self.inner
            .favorites
            .insert(record.document_key(), record.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, thread_id: &ThreadId) -> RepoResult<bool> {
        self.enter(StoreOp::FavoriteDelete).await?;
        Ok(self
            .inner
            .favorites
            .remove(&favorite_key(user_id, thread_id))
            .is_some())
    }

    async fn find_by_user(&self, user_id: &UserId, limit: i64) -> RepoResult<Vec<FavoriteRecord>> {
        self.enter(StoreOp::FavoriteList).await?;
        let mut records: Vec<FavoriteRecord> = self
            .inner
            .favorites
            .iter()
            .filter(|f| f.user_id == *user_id)
            .map(|f| f.value().clone())
            .collect();
        records.sort_by_key(|f| Reverse(f.created_at));
        Ok(paginate(records, 0, limit.clamp(1, 100)))
    }

    async fn thread_ids_by_user(&self, user_id: &UserId) -> RepoResult<Vec<ThreadId>> {
        self.enter(StoreOp::FavoriteIds).await?;
        Ok(self
            .inner
            .favorites
            .iter()
            .filter(|f| f.user_id == *user_id)
            .map(|f| f.thread_id.clone())
            .collect())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find(&self, user_id: &UserId) -> RepoResult<Option<Profile>> {
        self.enter(StoreOp::ProfileFind).await?;
        Ok(self.profile(user_id))
    }

    async fn upsert(&self, profile: &Profile) -> RepoResult<()> {
        self.enter(StoreOp::ProfileUpsert).await?;
        self.inner
            .profiles
            .entry(profile.user_id.clone())
            .and_modify(|existing| {
                existing.display_name.clone_from(&profile.display_name);
                existing.bio.clone_from(&profile.bio);
            })
            .or_insert_with(|| profile.clone());
        Ok(())
    }

    async fn touch_last_posted(&self, user_id: &UserId, at: DateTime<Utc>) -> RepoResult<()> {
        self.enter(StoreOp::ProfileTouch).await?;
        self.inner
            .profiles
            .entry(user_id.clone())
            .and_modify(|p| p.last_posted = Some(at))
            .or_insert_with(|| {
                let mut profile = Profile::new(user_id.clone(), String::new(), String::new());
                profile.last_posted = Some(at);
                profile.created_at = at;
                profile
            });
        Ok(())
    }
}

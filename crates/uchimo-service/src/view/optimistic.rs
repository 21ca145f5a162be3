//! Optimistic toggle drivers
//!
//! Each toggle flips the view synchronously, awaits the service, then either
//! confirms with the backend answer or rolls back and sends a `ViewNotice`.
//! The view lock is never held across the service call.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

use uchimo_common::Session;
use uchimo_core::{Post, PostId, ReactionType, ThreadId};

use crate::services::{
    FavoriteToggleService, ReactionToggleService, ServiceContext, ServiceResult,
};

use super::favorites::FavoriteView;
use super::reactions::ReactionView;

/// Notices kept for slow subscribers
const NOTICE_BUFFER: usize = 64;

/// Non-blocking notice shown after a failed toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewNotice {
    ReactionFailed {
        post_id: PostId,
        reaction_type: ReactionType,
        code: &'static str,
    },
    FavoriteFailed {
        thread_id: ThreadId,
        code: &'static str,
    },
}

/// What happened to an optimistic toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Backend answer applied
    Confirmed,
    /// Backend failed; the view was restored
    RolledBack,
    /// The view was detached or reloaded while the call was in flight
    Discarded,
}

/// Reaction buttons for one signed-in user
#[derive(Clone)]
pub struct OptimisticReactions {
    ctx: Arc<ServiceContext>,
    session: Session,
    view: Arc<Mutex<ReactionView>>,
    notices: broadcast::Sender<ViewNotice>,
}

impl OptimisticReactions {
    pub fn new(ctx: Arc<ServiceContext>, session: Session) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_BUFFER);
        Self {
            ctx,
            session,
            view: Arc::new(Mutex::new(ReactionView::new())),
            notices,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewNotice> {
        self.notices.subscribe()
    }

    /// Shared view state, for rendering
    pub fn view(&self) -> &Mutex<ReactionView> {
        &self.view
    }

    /// Load counts from `posts` and rebuild the mirror from the store
    #[instrument(skip(self, posts), fields(posts = posts.len()))]
    pub async fn load(&self, posts: &[Post]) -> ServiceResult<()> {
        let ids: Vec<PostId> = posts.iter().map(|p| p.id.clone()).collect();
        let reacted = ReactionToggleService::new(&self.ctx)
            .reacted_set(&self.session, &ids)
            .await?;

        self.view.lock().reset(posts, reacted);
        Ok(())
    }

    /// Run one optimistic reaction toggle
    #[instrument(skip(self), fields(user_id = %self.session.user_id()))]
    pub async fn toggle(&self, post_id: &PostId, reaction_type: ReactionType) -> ToggleOutcome {
        let attempt = self.view.lock().begin(post_id.clone(), reaction_type);

        let result = ReactionToggleService::new(&self.ctx)
            .toggle(&self.session, post_id, reaction_type)
            .await;

        match result {
            Ok(toggle) => {
                if self.view.lock().confirm(attempt, toggle) {
                    ToggleOutcome::Confirmed
                } else {
                    debug!("Reaction result discarded");
                    ToggleOutcome::Discarded
                }
            }
            Err(e) => {
                if !self.view.lock().rollback(attempt) {
                    debug!("Reaction failure discarded");
                    return ToggleOutcome::Discarded;
                }
                // No subscribers is fine
                let _ = self.notices.send(ViewNotice::ReactionFailed {
                    post_id: post_id.clone(),
                    reaction_type,
                    code: e.error_code(),
                });
                ToggleOutcome::RolledBack
            }
        }
    }

    /// Ignore results of toggles still in flight
    pub fn detach(&self) {
        self.view.lock().detach();
    }
}

/// Favorite stars for one signed-in user
#[derive(Clone)]
pub struct OptimisticFavorites {
    ctx: Arc<ServiceContext>,
    session: Session,
    view: Arc<Mutex<FavoriteView>>,
    notices: broadcast::Sender<ViewNotice>,
}

impl OptimisticFavorites {
    pub fn new(ctx: Arc<ServiceContext>, session: Session) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_BUFFER);
        Self {
            ctx,
            session,
            view: Arc::new(Mutex::new(FavoriteView::new())),
            notices,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewNotice> {
        self.notices.subscribe()
    }

    pub fn view(&self) -> &Mutex<FavoriteView> {
        &self.view
    }

    #[instrument(skip(self), fields(user_id = %self.session.user_id()))]
    pub async fn load(&self) -> ServiceResult<()> {
        let favorited = FavoriteToggleService::new(&self.ctx)
            .favorited_set(&self.session)
            .await?;

        self.view.lock().reset(favorited);
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %self.session.user_id()))]
    pub async fn toggle(&self, thread_id: &ThreadId) -> ToggleOutcome {
        let token = self.view.lock().begin(thread_id.clone());

        let result = FavoriteToggleService::new(&self.ctx)
            .toggle(&self.session, thread_id)
            .await;

        match result {
            Ok(toggle) => {
                if self.view.lock().confirm(token, toggle) {
                    ToggleOutcome::Confirmed
                } else {
                    ToggleOutcome::Discarded
                }
            }
            Err(e) => {
                if !self.view.lock().rollback(token) {
                    return ToggleOutcome::Discarded;
                }
                let _ = self.notices.send(ViewNotice::FavoriteFailed {
                    thread_id: thread_id.clone(),
                    code: e.error_code(),
                });
                ToggleOutcome::RolledBack
            }
        }
    }

    pub fn detach(&self) {
        self.view.lock().detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceContextBuilder;
    use uchimo_core::{Thread, UserId};
    use uchimo_db::{FaultKind, MemoryStore, StoreOp};

    fn post(uchimo: i64) -> Post {
        let mut post = Post::new(
            PostId::parse("p1").unwrap(),
            ThreadId::parse("t1").unwrap(),
            UserId::parse("author").unwrap(),
            "hello".to_string(),
        );
        post.likes_uchimo = uchimo;
        post
    }

    fn setup() -> (MemoryStore, Arc<ServiceContext>, Session) {
        let store = MemoryStore::new();
        let ctx = ServiceContextBuilder::new().memory(&store).build().unwrap();
        (
            store,
            Arc::new(ctx),
            Session::new(UserId::parse("u1").unwrap()),
        )
    }

    #[tokio::test]
    async fn test_reaction_confirmed() {
        let (store, ctx, me) = setup();
        let p = post(3);
        store.insert_post(p.clone());

        let reactions = OptimisticReactions::new(ctx, me);
        reactions.load(std::slice::from_ref(&p)).await.unwrap();

        let outcome = reactions.toggle(&p.id, ReactionType::Uchimo).await;
        assert_eq!(outcome, ToggleOutcome::Confirmed);

        let view = reactions.view().lock();
        assert!(view.is_reacted(&p.id, ReactionType::Uchimo));
        assert_eq!(view.count(&p.id, ReactionType::Uchimo), 4);
    }

    #[tokio::test]
    async fn test_reaction_failure_rolls_back_and_notifies() {
        let (store, ctx, me) = setup();
        let p = post(3);
        store.insert_post(p.clone());
        store
            .faults()
            .fail_once(StoreOp::ReactionCreate, FaultKind::Unavailable);

        let reactions = OptimisticReactions::new(ctx, me);
        reactions.load(std::slice::from_ref(&p)).await.unwrap();
        let mut notices = reactions.subscribe();

        let outcome = reactions.toggle(&p.id, ReactionType::Uchimo).await;
        assert_eq!(outcome, ToggleOutcome::RolledBack);

        {
            let view = reactions.view().lock();
            assert!(!view.is_reacted(&p.id, ReactionType::Uchimo));
            assert_eq!(view.count(&p.id, ReactionType::Uchimo), 3);
        }

        let notice = notices.try_recv().unwrap();
        assert_eq!(
            notice,
            ViewNotice::ReactionFailed {
                post_id: p.id.clone(),
                reaction_type: ReactionType::Uchimo,
                code: "REACTION_TOGGLE_FAILED",
            }
        );
    }

    #[tokio::test]
    async fn test_favorite_load_and_toggle() {
        let (store, ctx, me) = setup();
        let thread = Thread::new(
            ThreadId::parse("t1").unwrap(),
            "家族に頼れない自分が情けない".to_string(),
            vec![],
            18,
        );
        store.insert_thread(thread.clone());

        let favorites = OptimisticFavorites::new(ctx, me);
        favorites.load().await.unwrap();
        assert!(!favorites.view().lock().is_favorited(&thread.id));

        assert_eq!(
            favorites.toggle(&thread.id).await,
            ToggleOutcome::Confirmed
        );
        assert!(favorites.view().lock().is_favorited(&thread.id));
        assert!(store.has_favorite(&UserId::parse("u1").unwrap(), &thread.id));
    }
}

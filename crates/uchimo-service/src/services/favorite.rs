//! Favorite toggle service
//!
//! Same shape as the reaction toggle without a counter: one existence check
//! followed by one conditional write of the favorite edge.

use std::collections::HashSet;

use tracing::{info, instrument, warn};

use uchimo_common::Session;
use uchimo_core::{FavoriteRecord, ThreadId, UserId};

use crate::dto::{FavoriteToggle, ThreadResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::ToggleKey;

/// Favorite toggle service
pub struct FavoriteToggleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FavoriteToggleService<'a> {
    /// Create a new FavoriteToggleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip whether the signed-in user has favorited a thread
    ///
    /// # Errors
    /// `ToggleInProgress` when the guard rejects a concurrent toggle,
    /// `FavoriteToggleFailed` when the store fails
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn toggle(
        &self,
        session: &Session,
        thread_id: &ThreadId,
    ) -> ServiceResult<FavoriteToggle> {
        let user_id = session.user_id();
        let favorites = self.ctx.favorite_repo();

        let _permit = self
            .ctx
            .guard()
            .acquire(ToggleKey::favorite(thread_id, user_id))
            .await
            .map_err(|_| ServiceError::ToggleInProgress)?;

        let result = async {
            let was_favorited = favorites.exists(user_id, thread_id).await?;
            if was_favorited {
                favorites.delete(user_id, thread_id).await?;
            } else {
                favorites
                    .put(&FavoriteRecord::new(user_id.clone(), thread_id.clone()))
                    .await?;
            }
            Ok::<_, uchimo_core::DomainError>(!was_favorited)
        }
        .await;

        match result {
            Ok(new_is_favorited) => {
                info!(thread_id = %thread_id, favorited = new_is_favorited, "Favorite toggled");
                Ok(FavoriteToggle { new_is_favorited })
            }
            Err(e) => {
                warn!(thread_id = %thread_id, error = %e, "Favorite toggle failed");
                Err(ServiceError::FavoriteToggleFailed)
            }
        }
    }

    /// Thread ids the signed-in user has favorited, used to rebuild the
    /// client's mirror set on load
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn favorited_set(&self, session: &Session) -> ServiceResult<HashSet<ThreadId>> {
        let ids = self
            .ctx
            .favorite_repo()
            .thread_ids_by_user(session.user_id())
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// A user's favorited threads, most recently favorited first
    #[instrument(skip(self))]
    pub async fn favorite_threads(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> ServiceResult<Vec<ThreadResponse>> {
        let records = self.ctx.favorite_repo().find_by_user(user_id, limit).await?;
        let ids: Vec<ThreadId> = records.into_iter().map(|r| r.thread_id).collect();

        let threads = self.ctx.thread_repo().find_by_ids(&ids).await?;
        Ok(threads.iter().map(ThreadResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceContextBuilder;
    use uchimo_core::Thread;
    use uchimo_db::{FaultKind, MemoryStore, StoreOp};

    fn setup() -> (MemoryStore, ServiceContext, ThreadId) {
        let store = MemoryStore::new();
        let thread = Thread::new(
            ThreadId::parse("t1").unwrap(),
            "介護疲れが限界です".to_string(),
            vec!["介護".to_string()],
            3,
        );
        let thread_id = thread.id.clone();
        store.insert_thread(thread);

        let ctx = ServiceContextBuilder::new().memory(&store).build().unwrap();
        (store, ctx, thread_id)
    }

    fn session(user: &str) -> Session {
        Session::new(UserId::parse(user).unwrap())
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let (store, ctx, thread_id) = setup();
        let service = FavoriteToggleService::new(&ctx);
        let me = session("u1");

        let on = service.toggle(&me, &thread_id).await.unwrap();
        assert!(on.new_is_favorited);
        assert!(store.has_favorite(me.user_id(), &thread_id));

        let off = service.toggle(&me, &thread_id).await.unwrap();
        assert!(!off.new_is_favorited);
        assert!(!store.has_favorite(me.user_id(), &thread_id));
    }

    #[tokio::test]
    async fn test_failed_put_reports_umbrella_error() {
        let (store, ctx, thread_id) = setup();
        store
            .faults()
            .fail_once(StoreOp::FavoritePut, FaultKind::PermissionDenied);

        let err = FavoriteToggleService::new(&ctx)
            .toggle(&session("u1"), &thread_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::FavoriteToggleFailed));
        assert!(!store.has_favorite(&UserId::parse("u1").unwrap(), &thread_id));
    }

    #[tokio::test]
    async fn test_favorite_threads_and_set() {
        let (_store, ctx, thread_id) = setup();
        let service = FavoriteToggleService::new(&ctx);
        let me = session("u1");

        service.toggle(&me, &thread_id).await.unwrap();

        let set = service.favorited_set(&me).await.unwrap();
        assert!(set.contains(&thread_id));

        let threads = service.favorite_threads(me.user_id(), 20).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].slug, "介護疲れが限界です-3");
    }
}

//! Optimistic view state against the real services
//!
//! Run with: cargo test -p integration-tests --test view_tests

use std::collections::HashSet;

use integration_tests::{unique_session, TestBackend};
use uchimo_common::GuardPolicy;
use uchimo_core::{FavoriteRecord, FavoriteRepository, PostId, ReactionType, ThreadId};
use uchimo_db::{FaultKind, StoreOp};
use uchimo_service::view::ReactionTuple;
use uchimo_service::{
    OptimisticFavorites, OptimisticReactions, SyncState, ToggleOutcome, ViewNotice,
};

fn mirror_snapshot(reactions: &OptimisticReactions, post_id: &PostId) -> HashSet<ReactionTuple> {
    let view = reactions.view().lock();
    ReactionType::ALL
        .into_iter()
        .filter(|t| view.is_reacted(post_id, *t))
        .map(|t| (post_id.clone(), t))
        .collect()
}

#[tokio::test]
async fn test_failed_toggle_restores_mirror_exactly() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let post = backend.store.post(&post_id).unwrap();
    let reactions = OptimisticReactions::new(backend.ctx.clone(), unique_session());

    reactions.load(std::slice::from_ref(&post)).await.unwrap();
    assert_eq!(
        reactions.toggle(&post_id, ReactionType::Gambarou).await,
        ToggleOutcome::Confirmed
    );

    let before = mirror_snapshot(&reactions, &post_id);
    let count_before = reactions.view().lock().count(&post_id, ReactionType::Uchimo);

    for op in [
        StoreOp::ReactionExists,
        StoreOp::ReactionCreate,
        StoreOp::PostIncrement,
        StoreOp::PostFind,
    ] {
        backend.store.faults().fail_once(op, FaultKind::Unavailable);

        let outcome = reactions.toggle(&post_id, ReactionType::Uchimo).await;
        assert_eq!(outcome, ToggleOutcome::RolledBack, "fault at {op}");
        assert_eq!(mirror_snapshot(&reactions, &post_id), before, "fault at {op}");
        assert_eq!(
            reactions.view().lock().count(&post_id, ReactionType::Uchimo),
            count_before,
            "fault at {op}"
        );
        assert_eq!(
            reactions.view().lock().state(&post_id, ReactionType::Uchimo),
            SyncState::PendingWithError
        );
    }
}

#[tokio::test]
async fn test_overlapping_failed_toggles_return_to_store_state() {
    let backend = TestBackend::yielding(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let post = backend.store.post(&post_id).unwrap();
    let reactions = OptimisticReactions::new(backend.ctx.clone(), unique_session());
    reactions.load(std::slice::from_ref(&post)).await.unwrap();

    backend
        .store
        .faults()
        .fail_times(StoreOp::ReactionExists, FaultKind::Unavailable, 2);

    let (first, second) = tokio::join!(
        reactions.toggle(&post_id, ReactionType::Uchimo),
        reactions.toggle(&post_id, ReactionType::Uchimo),
    );
    assert_eq!(first, ToggleOutcome::RolledBack);
    assert_eq!(second, ToggleOutcome::RolledBack);

    let view = reactions.view().lock();
    assert!(!view.is_reacted(&post_id, ReactionType::Uchimo));
    assert_eq!(view.count(&post_id, ReactionType::Uchimo), 3);
    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 3);
    assert_eq!(backend.records(&post_id, ReactionType::Uchimo), 3);
}

#[tokio::test]
async fn test_overlap_with_one_failure_shows_backend_answer() {
    let backend = TestBackend::yielding(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let post = backend.store.post(&post_id).unwrap();
    let reactions = OptimisticReactions::new(backend.ctx.clone(), unique_session());
    reactions.load(std::slice::from_ref(&post)).await.unwrap();

    // Only the second toggle, which would remove the reaction, fails
    backend
        .store
        .faults()
        .fail_once(StoreOp::ReactionDelete, FaultKind::Unavailable);

    let (first, second) = tokio::join!(
        reactions.toggle(&post_id, ReactionType::Uchimo),
        reactions.toggle(&post_id, ReactionType::Uchimo),
    );
    assert_eq!(first, ToggleOutcome::Confirmed);
    assert_eq!(second, ToggleOutcome::RolledBack);

    let view = reactions.view().lock();
    assert!(view.is_reacted(&post_id, ReactionType::Uchimo));
    assert_eq!(view.count(&post_id, ReactionType::Uchimo), 4);
    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 4);
}

#[tokio::test]
async fn test_failures_emit_notices() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 0);
    let thread_id = backend.add_thread();
    let session = unique_session();

    let reactions = OptimisticReactions::new(backend.ctx.clone(), session.clone());
    let favorites = OptimisticFavorites::new(backend.ctx.clone(), session);
    let mut reaction_notices = reactions.subscribe();
    let mut favorite_notices = favorites.subscribe();

    backend
        .store
        .faults()
        .fail_once(StoreOp::ReactionExists, FaultKind::PermissionDenied);
    backend
        .store
        .faults()
        .fail_once(StoreOp::FavoritePut, FaultKind::Unavailable);

    assert_eq!(
        reactions.toggle(&post_id, ReactionType::Uchimo).await,
        ToggleOutcome::RolledBack
    );
    assert_eq!(favorites.toggle(&thread_id).await, ToggleOutcome::RolledBack);
    assert!(!favorites.view().lock().is_favorited(&thread_id));

    assert!(matches!(
        reaction_notices.try_recv().unwrap(),
        ViewNotice::ReactionFailed { .. }
    ));
    assert_eq!(
        favorite_notices.try_recv().unwrap(),
        ViewNotice::FavoriteFailed {
            thread_id,
            code: "FAVORITE_TOGGLE_FAILED",
        }
    );
}

#[tokio::test]
async fn test_detached_view_ignores_late_results() {
    let backend = TestBackend::yielding(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let post = backend.store.post(&post_id).unwrap();
    let reactions = OptimisticReactions::new(backend.ctx.clone(), unique_session());
    reactions.load(std::slice::from_ref(&post)).await.unwrap();

    let detach = async {
        tokio::task::yield_now().await;
        reactions.detach();
    };
    let (outcome, ()) = tokio::join!(reactions.toggle(&post_id, ReactionType::Uchimo), detach);

    // The backend write still happened; only the view result was dropped
    assert_eq!(outcome, ToggleOutcome::Discarded);
    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 4);
    assert_eq!(
        reactions.view().lock().state(&post_id, ReactionType::Uchimo),
        SyncState::Synced
    );
}

#[tokio::test]
async fn test_reload_rebuilds_mirror_from_store() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 0);
    let session = unique_session();

    let first = OptimisticReactions::new(backend.ctx.clone(), session.clone());
    let post = backend.store.post(&post_id).unwrap();
    first.load(std::slice::from_ref(&post)).await.unwrap();
    first.toggle(&post_id, ReactionType::Uchimo).await;

    // A second screen for the same user sees the reaction after loading
    let second = OptimisticReactions::new(backend.ctx.clone(), session);
    let post = backend.store.post(&post_id).unwrap();
    second.load(std::slice::from_ref(&post)).await.unwrap();

    let view = second.view().lock();
    assert!(view.is_reacted(&post_id, ReactionType::Uchimo));
    assert_eq!(view.count(&post_id, ReactionType::Uchimo), 1);
}

#[tokio::test]
async fn test_favorite_mirror_holds_every_favorite() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let session = unique_session();

    let mut threads = Vec::new();
    for _ in 0..150 {
        let thread_id = ThreadId::generate();
        backend
            .store
            .put(&FavoriteRecord::new(session.user_id().clone(), thread_id.clone()))
            .await
            .unwrap();
        threads.push(thread_id);
    }

    let favorites = OptimisticFavorites::new(backend.ctx.clone(), session);
    favorites.load().await.unwrap();

    let view = favorites.view().lock();
    assert_eq!(view.mirror().len(), 150);
    assert!(threads.iter().all(|t| view.is_favorited(t)));
}

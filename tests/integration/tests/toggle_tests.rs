//! Reaction and favorite toggle behavior
//!
//! Run with: cargo test -p integration-tests --test toggle_tests

use integration_tests::{unique_session, TestBackend};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uchimo_common::{GuardPolicy, Session};
use uchimo_core::{FavoriteRepository, ReactionType};
use uchimo_db::{FaultKind, StoreOp};
use uchimo_service::dto::ReactionToggle;
use uchimo_service::{FavoriteToggleService, ReactionToggleService, ServiceError};

// ============================================================================
// Sequential Properties
// ============================================================================

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let backend = TestBackend::new(GuardPolicy::Disabled);
    let post_id = backend.add_post(ReactionType::Gambarou, 2);
    let service = ReactionToggleService::new(&backend.ctx);
    let me = unique_session();

    let first = service
        .toggle(&me, &post_id, ReactionType::Gambarou)
        .await
        .unwrap();
    let second = service
        .toggle(&me, &post_id, ReactionType::Gambarou)
        .await
        .unwrap();

    assert!(first.new_is_reacted);
    assert!(!second.new_is_reacted);
    assert_eq!(second.new_count, 2);
    assert_eq!(backend.counter(&post_id, ReactionType::Gambarou), 2);
    assert_eq!(backend.records(&post_id, ReactionType::Gambarou), 2);
}

#[tokio::test]
async fn test_counter_matches_records_under_sequential_use() {
    let backend = TestBackend::new(GuardPolicy::Disabled);
    let post_id = backend.add_post(ReactionType::Uchimo, 0);
    let service = ReactionToggleService::new(&backend.ctx);

    let users: Vec<Session> = (0..6).map(|_| unique_session()).collect();
    let mut rng = StdRng::seed_from_u64(0x7563_6869);

    for _ in 0..200 {
        let user = &users[rng.gen_range(0..users.len())];
        let reaction_type = if rng.gen_bool(0.5) {
            ReactionType::Uchimo
        } else {
            ReactionType::Gambarou
        };
        let result = service.toggle(user, &post_id, reaction_type).await.unwrap();

        assert_eq!(result.new_count, backend.records(&post_id, reaction_type));
        assert_eq!(backend.drift(&post_id, ReactionType::Uchimo), 0);
        assert_eq!(backend.drift(&post_id, ReactionType::Gambarou), 0);
    }
}

#[tokio::test]
async fn test_reaction_types_are_independent() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 1);
    let service = ReactionToggleService::new(&backend.ctx);
    let me = unique_session();

    service
        .toggle(&me, &post_id, ReactionType::Gambarou)
        .await
        .unwrap();

    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 1);
    assert_eq!(backend.counter(&post_id, ReactionType::Gambarou), 1);
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[tokio::test]
async fn test_scenario_a_then_b() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let service = ReactionToggleService::new(&backend.ctx);
    let me = unique_session();

    let a = service
        .toggle(&me, &post_id, ReactionType::Uchimo)
        .await
        .unwrap();
    assert_eq!(
        a,
        ReactionToggle {
            new_count: 4,
            new_is_reacted: true
        }
    );
    assert_eq!(backend.records(&post_id, ReactionType::Uchimo), 4);

    let b = service
        .toggle(&me, &post_id, ReactionType::Uchimo)
        .await
        .unwrap();
    assert_eq!(
        b,
        ReactionToggle {
            new_count: 3,
            new_is_reacted: false
        }
    );
    assert_eq!(backend.records(&post_id, ReactionType::Uchimo), 3);
}

#[tokio::test]
async fn test_scenario_c_unguarded_drift_is_bounded() {
    let backend = TestBackend::yielding(GuardPolicy::Disabled);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let service = ReactionToggleService::new(&backend.ctx);
    let me = unique_session();

    // Both calls finish their existence check before either writes
    let (first, second) = tokio::join!(
        service.toggle(&me, &post_id, ReactionType::Uchimo),
        service.toggle(&me, &post_id, ReactionType::Uchimo),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    assert!(first.new_is_reacted);
    assert!(second.new_is_reacted);
    assert_eq!(backend.records(&post_id, ReactionType::Uchimo), 4);

    let drift = backend.drift(&post_id, ReactionType::Uchimo);
    assert!(drift.abs() <= 2, "drift {drift} exceeds interleaved calls");
    assert_eq!(drift, 1);
}

#[tokio::test]
async fn test_scenario_c_queued_is_consistent() {
    let backend = TestBackend::yielding(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let service = ReactionToggleService::new(&backend.ctx);
    let me = unique_session();

    let (first, second) = tokio::join!(
        service.toggle(&me, &post_id, ReactionType::Uchimo),
        service.toggle(&me, &post_id, ReactionType::Uchimo),
    );
    let mut results = [first.unwrap(), second.unwrap()];
    results.sort_by_key(|r| r.new_count);

    assert_eq!(
        results,
        [
            ReactionToggle {
                new_count: 3,
                new_is_reacted: false
            },
            ReactionToggle {
                new_count: 4,
                new_is_reacted: true
            },
        ]
    );
    assert_eq!(backend.drift(&post_id, ReactionType::Uchimo), 0);
    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 3);
    assert_eq!(backend.ctx.guard().in_flight(), 0);
}

#[tokio::test]
async fn test_scenario_c_rejected_is_consistent() {
    let backend = TestBackend::yielding(GuardPolicy::Reject);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    let service = ReactionToggleService::new(&backend.ctx);
    let me = unique_session();

    let (first, second) = tokio::join!(
        service.toggle(&me, &post_id, ReactionType::Uchimo),
        service.toggle(&me, &post_id, ReactionType::Uchimo),
    );

    let (ok, rejected): (Vec<_>, Vec<_>) = [first, second].into_iter().partition(Result::is_ok);
    assert_eq!(ok.len(), 1);
    assert_eq!(rejected.len(), 1);
    assert!(matches!(
        rejected.into_iter().next(),
        Some(Err(ServiceError::ToggleInProgress))
    ));

    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 4);
    assert_eq!(backend.drift(&post_id, ReactionType::Uchimo), 0);
}

#[tokio::test]
async fn test_different_users_do_not_block_each_other() {
    let backend = TestBackend::yielding(GuardPolicy::Reject);
    let post_id = backend.add_post(ReactionType::Gambarou, 0);
    let service = ReactionToggleService::new(&backend.ctx);
    let (alice, bob) = (unique_session(), unique_session());

    let (a, b) = tokio::join!(
        service.toggle(&alice, &post_id, ReactionType::Gambarou),
        service.toggle(&bob, &post_id, ReactionType::Gambarou),
    );
    assert!(a.unwrap().new_is_reacted);
    assert!(b.unwrap().new_is_reacted);
    assert_eq!(backend.counter(&post_id, ReactionType::Gambarou), 2);
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_counter_failure_is_reported_and_left_for_recount() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let post_id = backend.add_post(ReactionType::Uchimo, 3);
    backend
        .store
        .faults()
        .fail_once(StoreOp::PostIncrement, FaultKind::Unavailable);

    let err = ReactionToggleService::new(&backend.ctx)
        .toggle(&unique_session(), &post_id, ReactionType::Uchimo)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReactionToggleFailed));
    assert_eq!(backend.drift(&post_id, ReactionType::Uchimo), -1);

    let drift = uchimo_service::MaintenanceService::new(&backend.ctx)
        .recount_post(&post_id)
        .await
        .unwrap();
    assert_eq!(drift.get(ReactionType::Uchimo).unwrap().drift(), -1);
    assert_eq!(backend.drift(&post_id, ReactionType::Uchimo), 0);
    assert_eq!(backend.counter(&post_id, ReactionType::Uchimo), 4);
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
async fn test_favorite_delete_of_missing_is_noop() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let thread_id = backend.add_thread();
    let me = unique_session();

    let removed = backend
        .store
        .delete(me.user_id(), &thread_id)
        .await
        .unwrap();
    assert!(!removed);
}

#[tokio::test]
async fn test_favorite_toggle_twice() {
    let backend = TestBackend::new(GuardPolicy::Queue);
    let thread_id = backend.add_thread();
    let service = FavoriteToggleService::new(&backend.ctx);
    let me = unique_session();

    assert!(service.toggle(&me, &thread_id).await.unwrap().new_is_favorited);
    assert!(!service.toggle(&me, &thread_id).await.unwrap().new_is_favorited);
    assert!(!backend.store.has_favorite(me.user_id(), &thread_id));
}

//! End-to-end tests over PostgreSQL
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test pg_tests

use integration_tests::{new_post, pg_context, unique_session, unique_thread};
use uchimo_core::{PostRepository, PostSort, ReactionType, ThreadRepository};
use uchimo_db::{PgPostRepository, PgThreadRepository};
use uchimo_service::dto::{CreatePostRequest, ReactionToggle, SaveProfileRequest};
use uchimo_service::services::STARTER_THREADS;
use uchimo_service::{
    MaintenanceService, PostService, ProfileService, ReactionToggleService, ServiceError,
    ThreadService,
};

#[tokio::test]
async fn test_scenarios_a_and_b() {
    let Some((pool, ctx)) = pg_context().await else {
        return;
    };

    let thread = unique_thread();
    PgThreadRepository::new(pool.clone())
        .create(&thread)
        .await
        .unwrap();
    let post = new_post(&thread.id);
    let posts = PgPostRepository::new(pool);
    posts.create(&post).await.unwrap();
    posts
        .set_reaction_count(&post.id, ReactionType::Uchimo, 3)
        .await
        .unwrap();

    let service = ReactionToggleService::new(&ctx);
    let me = unique_session();

    let a = service
        .toggle(&me, &post.id, ReactionType::Uchimo)
        .await
        .unwrap();
    assert_eq!(
        a,
        ReactionToggle {
            new_count: 4,
            new_is_reacted: true
        }
    );

    let b = service
        .toggle(&me, &post.id, ReactionType::Uchimo)
        .await
        .unwrap();
    assert_eq!(
        b,
        ReactionToggle {
            new_count: 3,
            new_is_reacted: false
        }
    );
}

#[tokio::test]
async fn test_concurrent_users_keep_counter_exact() {
    let Some((pool, ctx)) = pg_context().await else {
        return;
    };

    let thread = unique_thread();
    PgThreadRepository::new(pool.clone())
        .create(&thread)
        .await
        .unwrap();
    let post = new_post(&thread.id);
    PgPostRepository::new(pool).create(&post).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ctx = ctx.clone();
        let post_id = post.id.clone();
        handles.push(tokio::spawn(async move {
            ReactionToggleService::new(&ctx)
                .toggle(&unique_session(), &post_id, ReactionType::Gambarou)
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().new_is_reacted);
    }

    let drift = MaintenanceService::new(&ctx)
        .recount_post(&post.id)
        .await
        .unwrap();
    assert!(drift.is_consistent());
    assert_eq!(drift.get(ReactionType::Gambarou).unwrap().actual, 8);
}

#[tokio::test]
async fn test_post_once_per_day_with_author_name() {
    let Some((pool, ctx)) = pg_context().await else {
        return;
    };

    let thread = unique_thread();
    PgThreadRepository::new(pool)
        .create(&thread)
        .await
        .unwrap();

    let me = unique_session();
    ProfileService::new(&ctx)
        .save_profile(
            &me,
            SaveProfileRequest {
                display_name: "はなこ".to_string(),
                bio: String::new(),
            },
        )
        .await
        .unwrap();

    let posts = PostService::new(&ctx);
    let created = posts
        .create_post(
            &me,
            &thread.id,
            CreatePostRequest {
                content: "今日もおつかれさま".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.author_name, "はなこ");

    let again = posts
        .create_post(
            &me,
            &thread.id,
            CreatePostRequest {
                content: "もう一度".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(again.status_code(), 409);
    assert!(matches!(again, ServiceError::Domain(_)));

    let page = posts
        .thread_posts(&thread.id, PostSort::New, 0)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);

    let found = ThreadService::new(&ctx)
        .find_by_slug(&thread.slug)
        .await
        .unwrap();
    assert_eq!(found.post_count, 1);
}

#[tokio::test]
async fn test_seed_defaults_is_idempotent() {
    let Some((_pool, ctx)) = pg_context().await else {
        return;
    };

    let service = ThreadService::new(&ctx);
    let first = service.seed_defaults().await.unwrap();
    assert_eq!(first.created.len() + first.skipped, STARTER_THREADS.len());

    let second = service.seed_defaults().await.unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, STARTER_THREADS.len());
}

//! Test helpers for integration tests
//!
//! `TestBackend` owns a `MemoryStore` and the `ServiceContext` built over it.
//! `pg_context` builds the same context over PostgreSQL.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use uchimo_common::{AppConfig, GuardPolicy, ToggleConfig};
use uchimo_core::{PostId, ReactionRecord, ReactionType, ThreadId};
use uchimo_db::{create_pool, run_migrations, MemoryStore, PgPool, PoolConfig, MIGRATIONS_DIR};
use uchimo_service::{ServiceContext, ServiceContextBuilder};

use crate::fixtures::{new_post, unique_thread, unique_user};

/// In-memory backend with the services wired over it
pub struct TestBackend {
    pub store: MemoryStore,
    pub ctx: Arc<ServiceContext>,
}

impl TestBackend {
    /// Backend whose store calls complete without suspending
    pub fn new(policy: GuardPolicy) -> Self {
        Self::build(MemoryStore::new(), policy)
    }

    /// Backend whose store calls each suspend once, so concurrent toggles
    /// on one runtime interleave at every store round trip
    pub fn yielding(policy: GuardPolicy) -> Self {
        Self::build(MemoryStore::yielding(), policy)
    }

    fn build(store: MemoryStore, policy: GuardPolicy) -> Self {
        let ctx = ServiceContextBuilder::new()
            .memory(&store)
            .toggle_config(ToggleConfig {
                guard: policy,
                reread_after_write: true,
            })
            .build()
            .expect("memory context always builds");
        Self {
            store,
            ctx: Arc::new(ctx),
        }
    }

    /// Insert a thread and return its id
    pub fn add_thread(&self) -> ThreadId {
        let thread = unique_thread();
        let id = thread.id.clone();
        self.store.insert_thread(thread);
        id
    }

    /// Insert a post that already has `existing` reactions of
    /// `reaction_type` from other users, counter in step with the records
    pub fn add_post(&self, reaction_type: ReactionType, existing: i64) -> PostId {
        let thread_id = self.add_thread();
        let mut post = new_post(&thread_id);
        *post.count_mut(reaction_type) = existing;
        let id = post.id.clone();
        self.store.insert_post(post);

        for _ in 0..existing {
            self.store.insert_reaction(ReactionRecord::new(
                id.clone(),
                unique_user(),
                reaction_type,
            ));
        }
        id
    }

    /// Counter value stored on the post
    pub fn counter(&self, post_id: &PostId, reaction_type: ReactionType) -> i64 {
        self.store
            .post(post_id)
            .map_or(0, |p| p.count(reaction_type))
    }

    /// Number of reaction records for the post
    pub fn records(&self, post_id: &PostId, reaction_type: ReactionType) -> i64 {
        self.store.record_count(post_id, reaction_type)
    }

    /// How far the counter is from the record count
    pub fn drift(&self, post_id: &PostId, reaction_type: ReactionType) -> i64 {
        self.counter(post_id, reaction_type) - self.records(post_id, reaction_type)
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Migrated pool and a context over it, or `None` when no database is
/// configured
pub async fn pg_context() -> Option<(PgPool, Arc<ServiceContext>)> {
    if !check_test_env() {
        return None;
    }

    let config = test_config().ok()?;
    let pool = create_pool(&PoolConfig::from(&config.database)).await.ok()?;
    run_migrations(&pool, Path::new(MIGRATIONS_DIR)).await.ok()?;

    let ctx = ServiceContextBuilder::new()
        .config(&config)
        .postgres(&pool)
        .build()
        .ok()?;
    Some((pool, Arc::new(ctx)))
}

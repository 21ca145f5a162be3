//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use uchimo_common::Session;
use uchimo_core::{Post, PostId, Thread, ThreadId, UserId};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A user id that no other test uses
pub fn unique_user() -> UserId {
    UserId::generate()
}

/// Session for a fresh user
pub fn unique_session() -> Session {
    Session::new(unique_user())
}

/// Thread with a title no other test uses
pub fn unique_thread() -> Thread {
    Thread::new(
        ThreadId::generate(),
        format!("テストスレッド{}", unique_suffix()),
        vec!["家族".to_string()],
        0,
    )
}

/// Post in `thread_id` with zero counters
pub fn new_post(thread_id: &ThreadId) -> Post {
    Post::new(
        PostId::generate(),
        thread_id.clone(),
        unique_user(),
        format!("今日のひとこと {}", unique_suffix()),
    )
}

//! Fault injection for the in-memory store

use std::collections::HashMap;
use std::fmt;

use uchimo_core::DomainError;

/// A single store round trip that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ReactionExists,
    ReactionCreate,
    ReactionDelete,
    ReactionFindForPosts,
    ReactionCount,
    PostFind,
    PostCreate,
    PostIncrement,
    PostSetCount,
    PostList,
    PostExistsSince,
    ThreadFind,
    ThreadList,
    ThreadCreate,
    ThreadIncrement,
    FavoriteExists,
    FavoritePut,
    FavoriteDelete,
    FavoriteList,
    FavoriteIds,
    ProfileFind,
    ProfileUpsert,
    ProfileTouch,
}

impl StoreOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReactionExists => "reaction.exists",
            Self::ReactionCreate => "reaction.create",
            Self::ReactionDelete => "reaction.delete",
            Self::ReactionFindForPosts => "reaction.find_by_user_for_posts",
            Self::ReactionCount => "reaction.count",
            Self::PostFind => "post.find",
            Self::PostCreate => "post.create",
            Self::PostIncrement => "post.increment_reaction",
            Self::PostSetCount => "post.set_reaction_count",
            Self::PostList => "post.list",
            Self::PostExistsSince => "post.exists_since",
            Self::ThreadFind => "thread.find",
            Self::ThreadList => "thread.list",
            Self::ThreadCreate => "thread.create",
            Self::ThreadIncrement => "thread.increment_post_count",
            Self::FavoriteExists => "favorite.exists",
            Self::FavoritePut => "favorite.put",
            Self::FavoriteDelete => "favorite.delete",
            Self::FavoriteList => "favorite.find_by_user",
            Self::FavoriteIds => "favorite.thread_ids_by_user",
            Self::ProfileFind => "profile.find",
            Self::ProfileUpsert => "profile.upsert",
            Self::ProfileTouch => "profile.touch_last_posted",
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an injected failure presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Network or backend outage
    Unavailable,
    /// Security rules rejected the request
    PermissionDenied,
}

impl FaultKind {
    fn to_error(self, op: StoreOp) -> DomainError {
        match self {
            Self::Unavailable => DomainError::StoreUnavailable(format!("injected fault on {op}")),
            Self::PermissionDenied => {
                DomainError::PermissionDenied(format!("injected fault on {op}"))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Remaining {
    Times(usize),
    Always,
}

/// Which operations should fail, and how often
#[derive(Debug, Default)]
pub struct FaultPlan {
    faults: HashMap<StoreOp, (FaultKind, Remaining)>,
}

impl FaultPlan {
    /// Fail the next call to `op` only
    pub fn fail_once(&mut self, op: StoreOp, kind: FaultKind) -> &mut Self {
        self.fail_times(op, kind, 1)
    }

    /// Fail the next `times` calls to `op`
    pub fn fail_times(&mut self, op: StoreOp, kind: FaultKind, times: usize) -> &mut Self {
        if times > 0 {
            self.faults.insert(op, (kind, Remaining::Times(times)));
        }
        self
    }

    /// Fail every call to `op` until cleared
    pub fn fail_always(&mut self, op: StoreOp, kind: FaultKind) -> &mut Self {
        self.faults.insert(op, (kind, Remaining::Always));
        self
    }

    pub fn clear(&mut self, op: StoreOp) -> &mut Self {
        self.faults.remove(&op);
        self
    }

    pub fn clear_all(&mut self) {
        self.faults.clear();
    }

    pub fn is_armed(&self, op: StoreOp) -> bool {
        self.faults.contains_key(&op)
    }

    /// Consume one failure for `op`, if any is planned
    pub(crate) fn trip(&mut self, op: StoreOp) -> Option<DomainError> {
        let (kind, remaining) = self.faults.get_mut(&op)?;
        let kind = *kind;

        let exhausted = match remaining {
            Remaining::Always => false,
            Remaining::Times(n) => {
                *n -= 1;
                *n == 0
            }
        };
        if exhausted {
            self.faults.remove(&op);
        }

        Some(kind.to_error(op))
    }
}

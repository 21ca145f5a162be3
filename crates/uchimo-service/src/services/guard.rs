//! Per-item in-flight guard for toggles
//!
//! A toggle is several separate store round trips. Two toggles on the same
//! (entity, user, kind) tuple that interleave can leave the counter out of
//! step with the records, so toggles on one tuple are serialized here
//! according to the configured `GuardPolicy`. Different tuples never wait
//! for each other.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use uchimo_common::GuardPolicy;
use uchimo_core::{PostId, ReactionType, ThreadId, UserId};

/// What is being toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleKind {
    Reaction(ReactionType),
    Favorite,
}

/// Identity of one toggleable item for one user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToggleKey {
    entity: String,
    user: UserId,
    kind: ToggleKind,
}

impl ToggleKey {
    pub fn reaction(post_id: &PostId, user_id: &UserId, reaction_type: ReactionType) -> Self {
        Self {
            entity: post_id.to_string(),
            user: user_id.clone(),
            kind: ToggleKind::Reaction(reaction_type),
        }
    }

    pub fn favorite(thread_id: &ThreadId, user_id: &UserId) -> Self {
        Self {
            entity: thread_id.to_string(),
            user: user_id.clone(),
            kind: ToggleKind::Favorite,
        }
    }
}

impl fmt::Display for ToggleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ToggleKind::Reaction(rt) => write!(f, "{}/{}/{rt}", self.entity, self.user),
            ToggleKind::Favorite => write!(f, "{}/{}/favorite", self.entity, self.user),
        }
    }
}

/// Returned by `acquire` under the reject policy when the tuple is busy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("toggle already in flight for {0}")]
pub struct GuardBusy(pub ToggleKey);

type Slots = DashMap<ToggleKey, Arc<Mutex<()>>>;

/// In-flight toggle registry
pub struct ToggleGuard {
    policy: GuardPolicy,
    slots: Arc<Slots>,
}

impl ToggleGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self {
            policy,
            slots: Arc::new(DashMap::new()),
        }
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    /// Number of tuples with a toggle running or waiting
    pub fn in_flight(&self) -> usize {
        self.slots.len()
    }

    /// Wait for (queue), or claim immediately (reject), the right to toggle
    /// `key`. Under the disabled policy every call gets a permit at once.
    ///
    /// # Errors
    /// `GuardBusy` under the reject policy when another toggle holds the key
    pub async fn acquire(&self, key: ToggleKey) -> Result<TogglePermit, GuardBusy> {
        match self.policy {
            GuardPolicy::Disabled => Ok(TogglePermit { held: None }),
            GuardPolicy::Reject => {
                let slot = self.slot(&key);
                let Ok(lock) = slot.try_lock_owned() else {
                    debug!(%key, "Toggle rejected, another is in flight");
                    return Err(GuardBusy(key));
                };
                Ok(self.permit(key, lock))
            }
            GuardPolicy::Queue => {
                let slot = self.slot(&key);
                let lock = match slot.clone().try_lock_owned() {
                    Ok(lock) => lock,
                    Err(_) => {
                        debug!(%key, "Toggle queued behind one in flight");
                        slot.lock_owned().await
                    }
                };
                Ok(self.permit(key, lock))
            }
        }
    }

    fn slot(&self, key: &ToggleKey) -> Arc<Mutex<()>> {
        self.slots.entry(key.clone()).or_default().clone()
    }

    fn permit(&self, key: ToggleKey, lock: OwnedMutexGuard<()>) -> TogglePermit {
        TogglePermit {
            held: Some(Held {
                key,
                lock: Some(lock),
                slots: Arc::clone(&self.slots),
            }),
        }
    }
}

impl fmt::Debug for ToggleGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleGuard")
            .field("policy", &self.policy)
            .field("in_flight", &self.slots.len())
            .finish()
    }
}

struct Held {
    key: ToggleKey,
    lock: Option<OwnedMutexGuard<()>>,
    slots: Arc<Slots>,
}

/// Right to run one toggle; released on drop
pub struct TogglePermit {
    held: Option<Held>,
}

impl Drop for TogglePermit {
    fn drop(&mut self) {
        if let Some(mut held) = self.held.take() {
            drop(held.lock.take());
            // Only the map's own reference left means nobody is waiting
            held.slots
                .remove_if(&held.key, |_, slot| Arc::strong_count(slot) == 1);
        }
    }
}

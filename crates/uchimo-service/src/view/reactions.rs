//! Reaction buttons view state

use std::collections::HashMap;

use uchimo_core::{Post, PostId, ReactionCounts, ReactionType};

use crate::dto::ReactionToggle;

use super::mirror::{MirrorSet, PendingToggle, SyncState};

/// (post, reaction type) pair the mirror is keyed by
pub type ReactionTuple = (PostId, ReactionType);

/// One optimistic reaction toggle in flight
#[derive(Debug)]
#[must_use = "a reaction attempt must be confirmed or rolled back"]
pub struct ReactionAttempt {
    token: PendingToggle<ReactionTuple>,
}

impl ReactionAttempt {
    pub fn post_id(&self) -> &PostId {
        &self.token.key().0
    }

    pub fn reaction_type(&self) -> ReactionType {
        self.token.key().1
    }
}

/// Which reactions the user has made and the counts shown next to them
///
/// `counts` only holds backend answers. The shown count is derived from it
/// and the mirror: one more while a reaction is shown but not confirmed, one
/// less (never below zero) in the opposite case.
#[derive(Debug, Default)]
pub struct ReactionView {
    mirror: MirrorSet<ReactionTuple>,
    counts: HashMap<PostId, ReactionCounts>,
}

impl ReactionView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with freshly loaded posts and the user's reactions
    pub fn reset<'p>(
        &mut self,
        posts: impl IntoIterator<Item = &'p Post>,
        reacted: impl IntoIterator<Item = ReactionTuple>,
    ) {
        self.counts = posts
            .into_iter()
            .map(|p| {
                (
                    p.id.clone(),
                    ReactionCounts::new(p.likes_uchimo, p.likes_gambarou),
                )
            })
            .collect();
        self.mirror.reset(reacted);
    }

    pub fn is_reacted(&self, post_id: &PostId, reaction_type: ReactionType) -> bool {
        self.mirror.contains(&(post_id.clone(), reaction_type))
    }

    /// Count shown for a post, zero for posts not loaded
    pub fn count(&self, post_id: &PostId, reaction_type: ReactionType) -> i64 {
        let confirmed = self
            .counts
            .get(post_id)
            .map_or(0, |c| c.get(reaction_type));

        let key = (post_id.clone(), reaction_type);
        match (self.mirror.is_confirmed(&key), self.mirror.contains(&key)) {
            (false, true) => confirmed + 1,
            (true, false) => (confirmed - 1).max(0),
            _ => confirmed,
        }
    }

    pub fn state(&self, post_id: &PostId, reaction_type: ReactionType) -> SyncState {
        self.mirror.state(&(post_id.clone(), reaction_type))
    }

    pub fn mirror(&self) -> &MirrorSet<ReactionTuple> {
        &self.mirror
    }

    /// Flip the reaction; the shown count follows the flip
    pub fn begin(&mut self, post_id: PostId, reaction_type: ReactionType) -> ReactionAttempt {
        ReactionAttempt {
            token: self.mirror.begin((post_id, reaction_type)),
        }
    }

    /// Take the backend's count as authoritative; false when the attempt is stale
    pub fn confirm(&mut self, attempt: ReactionAttempt, result: ReactionToggle) -> bool {
        let (post_id, reaction_type) = attempt.token.key().clone();
        if !self.mirror.confirm(attempt.token, result.new_is_reacted) {
            return false;
        }
        self.set_count(post_id, reaction_type, result.new_count);
        true
    }

    /// Undo this attempt's flip; false when the attempt is stale
    pub fn rollback(&mut self, attempt: ReactionAttempt) -> bool {
        self.mirror.rollback(attempt.token)
    }

    pub fn acknowledge(&mut self, post_id: &PostId, reaction_type: ReactionType) {
        self.mirror.acknowledge(&(post_id.clone(), reaction_type));
    }

    pub fn detach(&mut self) {
        self.mirror.detach();
    }

    fn set_count(&mut self, post_id: PostId, reaction_type: ReactionType, value: i64) {
        self.counts
            .entry(post_id)
            .or_default()
            .set(reaction_type, value);
    }
}

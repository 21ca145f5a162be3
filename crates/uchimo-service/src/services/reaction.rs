//! Reaction toggle service
//!
//! A toggle is four separate store round trips: existence check, record
//! create or delete, counter increment, and (optionally) a re-read of the
//! post. The record and the counter are not written atomically together, so
//! a failure between them leaves the counter off by one until an operator
//! recounts the post. Failures are logged with the step that broke and
//! reported to the caller only as `ReactionToggleFailed`.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use uchimo_common::Session;
use uchimo_core::{DomainError, PostId, ReactionRecord, ReactionType, UserId};

use crate::dto::ReactionToggle;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::guard::ToggleKey;

/// Store write that failed during a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    RecordCreate,
    RecordDelete,
    CounterIncrement,
    PostReread,
}

impl WriteStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecordCreate => "record-create",
            Self::RecordDelete => "record-delete",
            Self::CounterIncrement => "counter-increment",
            Self::PostReread => "post-reread",
        }
    }
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a toggle failed, for logs
#[derive(Debug, thiserror::Error)]
pub enum ToggleFailure {
    /// The existence check did not complete; nothing was written
    #[error("existence check failed: {0}")]
    LookupFailed(#[source] DomainError),

    #[error("{step} failed: {source}")]
    WriteFailed {
        step: WriteStep,
        #[source]
        source: DomainError,
    },
}

impl ToggleFailure {
    fn write(step: WriteStep) -> impl FnOnce(DomainError) -> Self {
        move |source| Self::WriteFailed { step, source }
    }

    pub fn step(&self) -> &'static str {
        match self {
            Self::LookupFailed(_) => "lookup",
            Self::WriteFailed { step, .. } => step.as_str(),
        }
    }

    /// Whether the record changed but its counter did not
    pub fn leaves_drift(&self) -> bool {
        matches!(
            self,
            Self::WriteFailed {
                step: WriteStep::CounterIncrement,
                ..
            }
        )
    }
}

/// Reaction toggle service
pub struct ReactionToggleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionToggleService<'a> {
    /// Create a new ReactionToggleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip the signed-in user's reaction of `reaction_type` on a post
    ///
    /// # Errors
    /// `ToggleInProgress` when the guard rejects a concurrent toggle,
    /// `ReactionToggleFailed` when any store step fails
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn toggle(
        &self,
        session: &Session,
        post_id: &PostId,
        reaction_type: ReactionType,
    ) -> ServiceResult<ReactionToggle> {
        let user_id = session.user_id();

        let _permit = self
            .ctx
            .guard()
            .acquire(ToggleKey::reaction(post_id, user_id, reaction_type))
            .await
            .map_err(|_| ServiceError::ToggleInProgress)?;

        match self.apply(post_id, user_id, reaction_type).await {
            Ok(result) => {
                info!(
                    post_id = %post_id,
                    reaction = %reaction_type,
                    reacted = result.new_is_reacted,
                    count = result.new_count,
                    "Reaction toggled"
                );
                Ok(result)
            }
            Err(failure) => {
                warn!(
                    post_id = %post_id,
                    reaction = %reaction_type,
                    step = failure.step(),
                    counter_may_drift = failure.leaves_drift(),
                    error = %failure,
                    "Reaction toggle failed"
                );
                Err(ServiceError::ReactionToggleFailed)
            }
        }
    }

    async fn apply(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        reaction_type: ReactionType,
    ) -> Result<ReactionToggle, ToggleFailure> {
        let reactions = self.ctx.reaction_repo();
        let posts = self.ctx.post_repo();

        let was_reacted = reactions
            .exists(post_id, user_id, reaction_type)
            .await
            .map_err(ToggleFailure::LookupFailed)?;

        if was_reacted {
            let removed = reactions
                .delete(post_id, user_id, reaction_type)
                .await
                .map_err(ToggleFailure::write(WriteStep::RecordDelete))?;
            if !removed {
                debug!(post_id = %post_id, "Reaction record was already gone");
            }
        } else {
            let record = ReactionRecord::new(post_id.clone(), user_id.clone(), reaction_type);
            let created = reactions
                .create(&record)
                .await
                .map_err(ToggleFailure::write(WriteStep::RecordCreate))?;
            if !created {
                debug!(post_id = %post_id, "Reaction record already existed");
            }
        }

        let delta = if was_reacted { -1 } else { 1 };
        let incremented = match posts.increment_reaction(post_id, reaction_type, delta).await {
            Ok(count) => count,
            Err(e @ DomainError::PostNotFound(_)) => {
                // No post to count against; drop the record written above
                if !was_reacted {
                    if let Err(cleanup) = reactions.delete(post_id, user_id, reaction_type).await {
                        warn!(
                            post_id = %post_id,
                            error = %cleanup,
                            "Orphan reaction record left behind"
                        );
                    }
                }
                return Err(ToggleFailure::write(WriteStep::CounterIncrement)(e));
            }
            Err(e) => return Err(ToggleFailure::write(WriteStep::CounterIncrement)(e)),
        };

        let new_count = if self.ctx.toggle_config().reread_after_write {
            posts
                .find_by_id(post_id)
                .await
                .map_err(ToggleFailure::write(WriteStep::PostReread))?
                .ok_or_else(|| {
                    ToggleFailure::write(WriteStep::PostReread)(DomainError::PostNotFound(
                        post_id.clone(),
                    ))
                })?
                .count(reaction_type)
        } else {
            incremented
        };

        Ok(ReactionToggle {
            new_count,
            new_is_reacted: !was_reacted,
        })
    }

    /// Reactions the signed-in user has on the given posts, used to rebuild
    /// the client's mirror set on load
    #[instrument(skip(self, session, post_ids), fields(posts = post_ids.len()))]
    pub async fn reacted_set(
        &self,
        session: &Session,
        post_ids: &[PostId],
    ) -> ServiceResult<HashSet<(PostId, ReactionType)>> {
        let records = self
            .ctx
            .reaction_repo()
            .find_by_user_for_posts(session.user_id(), post_ids)
            .await?;

        Ok(records
            .into_iter()
            .map(|r| (r.post_id, r.reaction_type))
            .collect())
    }
}

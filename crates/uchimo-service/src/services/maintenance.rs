//! Counter maintenance
//!
//! A failed toggle can leave a post's counter one away from the number of
//! reaction records. Nothing repairs that on the toggle path; an operator
//! runs `recount_post` when counts look off.

use tracing::{info, instrument, warn};

use uchimo_core::{PostId, ReactionType};

use crate::dto::{CounterDrift, DriftEntry};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Maintenance service
pub struct MaintenanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MaintenanceService<'a> {
    /// Create a new MaintenanceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reset each reaction counter of a post to its record count
    ///
    /// Returns the counters as they were found so callers can report drift.
    #[instrument(skip(self))]
    pub async fn recount_post(&self, post_id: &PostId) -> ServiceResult<CounterDrift> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;

        let mut entries = Vec::with_capacity(ReactionType::ALL.len());
        for reaction_type in ReactionType::ALL {
            let actual = self.ctx.reaction_repo().count(post_id, reaction_type).await?;
            let entry = DriftEntry {
                reaction_type,
                stored: post.count(reaction_type),
                actual,
            };

            if entry.drift() != 0 {
                warn!(
                    reaction = %reaction_type,
                    stored = entry.stored,
                    actual,
                    "Counter drift repaired"
                );
                self.ctx
                    .post_repo()
                    .set_reaction_count(post_id, reaction_type, actual)
                    .await?;
            }
            entries.push(entry);
        }

        let drift = CounterDrift {
            post_id: post_id.to_string(),
            entries,
        };
        info!(consistent = drift.is_consistent(), "Post recounted");
        Ok(drift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceContextBuilder;
    use uchimo_core::{Post, ReactionRecord, ThreadId, UserId};
    use uchimo_db::MemoryStore;

    fn setup() -> (MemoryStore, ServiceContext, PostId) {
        let store = MemoryStore::new();
        let mut post = Post::new(
            PostId::parse("p1").unwrap(),
            ThreadId::parse("t1").unwrap(),
            UserId::parse("author").unwrap(),
            "hello".to_string(),
        );
        post.likes_uchimo = 5;
        post.likes_gambarou = 1;
        let post_id = post.id.clone();
        store.insert_post(post);
        store.insert_reaction(ReactionRecord::new(
            post_id.clone(),
            UserId::parse("u1").unwrap(),
            ReactionType::Uchimo,
        ));
        store.insert_reaction(ReactionRecord::new(
            post_id.clone(),
            UserId::parse("u2").unwrap(),
            ReactionType::Gambarou,
        ));

        let ctx = ServiceContextBuilder::new().memory(&store).build().unwrap();
        (store, ctx, post_id)
    }

    #[tokio::test]
    async fn test_recount_repairs_drift() {
        let (store, ctx, post_id) = setup();
        let service = MaintenanceService::new(&ctx);

        let drift = service.recount_post(&post_id).await.unwrap();
        assert!(!drift.is_consistent());
        assert_eq!(drift.get(ReactionType::Uchimo).unwrap().drift(), 4);
        assert_eq!(drift.get(ReactionType::Gambarou).unwrap().drift(), 0);

        let post = store.post(&post_id).unwrap();
        assert_eq!(post.likes_uchimo, 1);
        assert_eq!(post.likes_gambarou, 1);

        // Second pass finds nothing to fix
        assert!(service.recount_post(&post_id).await.unwrap().is_consistent());
    }

    #[tokio::test]
    async fn test_recount_unknown_post() {
        let (_store, ctx, _) = setup();
        let err = MaintenanceService::new(&ctx)
            .recount_post(&PostId::parse("missing").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}

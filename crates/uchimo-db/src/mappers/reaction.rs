//! Reaction model -> entity mapper

use uchimo_core::{DomainError, PostId, ReactionRecord, ReactionType, UserId};

use super::corrupt_column;
use crate::models::ReactionModel;

impl TryFrom<ReactionModel> for ReactionRecord {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let reaction_type = ReactionType::parse(&model.reaction_type).ok_or_else(|| {
            DomainError::DatabaseError(format!(
                "invalid reactions.reaction_type in row: {}",
                model.reaction_type
            ))
        })?;

        Ok(ReactionRecord {
            post_id: PostId::parse(model.post_id).map_err(corrupt_column("reactions.post_id"))?,
            user_id: UserId::parse(model.user_id).map_err(corrupt_column("reactions.user_id"))?,
            reaction_type,
            created_at: model.created_at,
        })
    }
}

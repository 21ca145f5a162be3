//! Favorite model -> entity mapper

use uchimo_core::{DomainError, FavoriteRecord, ThreadId, UserId};

use super::corrupt_column;
use crate::models::FavoriteModel;

impl TryFrom<FavoriteModel> for FavoriteRecord {
    type Error = DomainError;

    fn try_from(model: FavoriteModel) -> Result<Self, Self::Error> {
        Ok(FavoriteRecord {
            user_id: UserId::parse(model.user_id).map_err(corrupt_column("favorites.user_id"))?,
            thread_id: ThreadId::parse(model.thread_id)
                .map_err(corrupt_column("favorites.thread_id"))?,
            created_at: model.created_at,
        })
    }
}

//! Profile model -> entity mapper

use uchimo_core::{DomainError, Profile, UserId};

use super::corrupt_column;
use crate::models::ProfileModel;

impl TryFrom<ProfileModel> for Profile {
    type Error = DomainError;

    fn try_from(model: ProfileModel) -> Result<Self, Self::Error> {
        Ok(Profile {
            user_id: UserId::parse(model.user_id).map_err(corrupt_column("profiles.user_id"))?,
            display_name: model.display_name,
            bio: model.bio,
            last_posted: model.last_posted,
            created_at: model.created_at,
        })
    }
}

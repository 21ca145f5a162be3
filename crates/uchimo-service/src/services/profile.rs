//! Profile service

use tracing::{info, instrument};
use validator::Validate;

use uchimo_common::Session;
use uchimo_core::{DomainError, Profile, UserId, ANONYMOUS_NAME};

use crate::dto::{ProfileResponse, SaveProfileRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a user's public profile
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: &UserId) -> ServiceResult<ProfileResponse> {
        let profile = self
            .ctx
            .profile_repo()
            .find(user_id)
            .await?
            .ok_or_else(|| DomainError::ProfileNotFound(user_id.clone()))?;

        Ok(ProfileResponse::from(&profile))
    }

    /// Create or update the signed-in user's profile
    #[instrument(skip(self, session, request), fields(user_id = %session.user_id()))]
    pub async fn save_profile(
        &self,
        session: &Session,
        request: SaveProfileRequest,
    ) -> ServiceResult<ProfileResponse> {
        request.validate()?;

        let user_id = session.user_id();
        let profile = Profile::new(
            user_id.clone(),
            request.display_name.trim().to_string(),
            request.bio.trim().to_string(),
        );
        self.ctx.profile_repo().upsert(&profile).await?;

        info!("Profile saved");

        self.get(user_id).await
    }

    /// Name to show next to a user's posts
    pub async fn display_name(&self, user_id: &UserId) -> ServiceResult<String> {
        let profile = self.ctx.profile_repo().find(user_id).await?;
        Ok(profile.map_or_else(
            || ANONYMOUS_NAME.to_string(),
            |p| p.name_or_anonymous().to_string(),
        ))
    }
}

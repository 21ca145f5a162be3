//! Post service
//!
//! Handles posting to threads and post listings.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use futures::future::try_join_all;
use tracing::{info, instrument};
use validator::Validate;

use uchimo_common::Session;
use uchimo_core::{DomainError, Post, PostId, PostQuery, PostSort, ThreadId, UserId};

use crate::dto::{CreatePostRequest, Page, PostResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::profile::ProfileService;

/// Start of the local calendar day containing `now`, for a fixed UTC offset
pub fn local_day_start(now: DateTime<Utc>, utc_offset_hours: i32) -> DateTime<Utc> {
    let offset = Duration::hours(i64::from(utc_offset_hours));
    let local_midnight = (now.naive_utc() + offset).date().and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local_midnight - offset))
}

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post to a thread as the signed-in user
    ///
    /// # Errors
    /// Validation errors for empty or oversized content, not found for an
    /// unknown thread, `AlreadyPostedToday` when the user already posted to
    /// this thread on the current local day
    pub async fn create_post(
        &self,
        session: &Session,
        thread_id: &ThreadId,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        self.create_post_at(session, thread_id, request, Utc::now())
            .await
    }

    /// `create_post` with an explicit clock reading
    #[instrument(skip(self, session, request), fields(user_id = %session.user_id()))]
    pub async fn create_post_at(
        &self,
        session: &Session,
        thread_id: &ThreadId,
        request: CreatePostRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<PostResponse> {
        request.validate()?;

        let content = request.content.trim();
        if content.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }
        let max = self.ctx.posting_config().max_content_chars;
        if content.chars().count() > max {
            return Err(DomainError::ContentTooLong { max }.into());
        }

        let author_id = session.user_id();

        if self.ctx.thread_repo().find_by_id(thread_id).await?.is_none() {
            return Err(ServiceError::not_found("Thread", thread_id.to_string()));
        }

        if self.has_posted_on(author_id, thread_id, now).await? {
            return Err(DomainError::AlreadyPostedToday.into());
        }

        let mut post = Post::new(
            PostId::generate(),
            thread_id.clone(),
            author_id.clone(),
            content.to_string(),
        );
        post.created_at = now;

        self.ctx.post_repo().create(&post).await?;
        let post_count = self.ctx.thread_repo().increment_post_count(thread_id).await?;
        self.ctx
            .profile_repo()
            .touch_last_posted(author_id, now)
            .await?;

        info!(
            post_id = %post.id,
            thread_id = %thread_id,
            post_count,
            "Post created"
        );

        let author_name = ProfileService::new(self.ctx).display_name(author_id).await?;
        Ok(PostResponse::from_post(&post, author_name))
    }

    /// Whether the signed-in user already posted to the thread today
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn has_posted_today(
        &self,
        session: &Session,
        thread_id: &ThreadId,
    ) -> ServiceResult<bool> {
        self.has_posted_on(session.user_id(), thread_id, Utc::now())
            .await
    }

    async fn has_posted_on(
        &self,
        author_id: &UserId,
        thread_id: &ThreadId,
        now: DateTime<Utc>,
    ) -> ServiceResult<bool> {
        let since = local_day_start(now, self.ctx.posting_config().utc_offset_hours);
        Ok(self
            .ctx
            .post_repo()
            .exists_since(author_id, thread_id, since)
            .await?)
    }

    /// One page of a thread's posts
    #[instrument(skip(self))]
    pub async fn thread_posts(
        &self,
        thread_id: &ThreadId,
        sort: PostSort,
        offset: i64,
    ) -> ServiceResult<Page<PostResponse>> {
        let limit = self.ctx.feed_config().page_size;
        let posts = self
            .ctx
            .post_repo()
            .find_by_thread(thread_id, PostQuery::new(sort, limit).after(offset))
            .await?;

        Ok(Page::new(self.with_author_names(posts).await?, offset, limit))
    }

    /// One page of a user's posts across all threads
    #[instrument(skip(self))]
    pub async fn user_posts(
        &self,
        user_id: &UserId,
        sort: PostSort,
        offset: i64,
    ) -> ServiceResult<Page<PostResponse>> {
        let limit = self.ctx.feed_config().page_size;
        let posts = self
            .ctx
            .post_repo()
            .find_by_author(user_id, PostQuery::new(sort, limit).after(offset))
            .await?;

        Ok(Page::new(self.with_author_names(posts).await?, offset, limit))
    }

    async fn with_author_names(&self, posts: Vec<Post>) -> ServiceResult<Vec<PostResponse>> {
        let mut authors: Vec<&UserId> = posts.iter().map(|p| &p.author_id).collect();
        authors.sort();
        authors.dedup();

        let profiles = ProfileService::new(self.ctx);
        let names = try_join_all(authors.iter().map(|id| profiles.display_name(id))).await?;
        let names: HashMap<&UserId, String> = authors.into_iter().zip(names).collect();

        Ok(posts
            .iter()
            .map(|post| {
                let name = names
                    .get(&post.author_id)
                    .map_or(uchimo_core::ANONYMOUS_NAME, String::as_str);
                PostResponse::from_post(post, name)
            })
            .collect())
    }
}

//! Thread service
//!
//! Thread creation, lookup by slug, listings, and seeding of the starter
//! threads a fresh installation ships with.

use tracing::{debug, info, instrument};
use validator::Validate;

use uchimo_core::{slugify, DomainError, Thread, ThreadId, ThreadQuery, ThreadSort};

use crate::dto::{CreateThreadRequest, Page, SeedReport, ThreadResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Slug indices tried before giving up on a title
const MAX_SLUG_INDEX: usize = 100;

/// Starter threads, seeded with their position as the slug index
pub const STARTER_THREADS: &[(&str, &[&str])] = &[
    (
        "親との価値観の違いに悩んでいます",
        &["家族", "親子関係", "家庭内不和", "価値観", "親"],
    ),
    (
        "子育てがうまくいかない",
        &["家族", "子育て", "親子関係", "子"],
    ),
    (
        "夫との家事分担でもめています",
        &["家族", "夫婦関係", "共働き・家事", "夫"],
    ),
    (
        "介護疲れが限界です",
        &["家族", "介護", "プレッシャー", "親", "夫", "妻", "子", "兄弟"],
    ),
    (
        "義理の家族との関係がつらい",
        &["家族", "義家族", "家庭内不和", "義父", "義母", "義兄", "義弟", "義姉", "義妹"],
    ),
    (
        "子どもが反抗期で会話ができない",
        &["家族", "親子関係", "子育て", "子", "反抗期"],
    ),
    (
        "シングルマザーとしての不安",
        &["家族", "子育て", "孤独", "子", "離婚", "ひとり親", "お金"],
    ),
    (
        "家族に自分の気持ちを伝えられない",
        &["家族", "家庭内不和", "秘密・打ち明け"],
    ),
    (
        "親が過干渉で苦しい",
        &["家族", "親子関係", "プレッシャー", "親", "過干渉"],
    ),
    (
        "育児と仕事の両立ができない",
        &["家族", "子育て", "共働き・家事", "仕事", "夫", "妻", "子", "お金"],
    ),
    (
        "兄弟との不仲が長年続いています",
        &["家族", "親子関係", "家庭内不和", "兄弟", "兄", "弟", "姉", "妹"],
    ),
    (
        "家族内で孤立していると感じます",
        &["家族", "孤独", "家庭内不和"],
    ),
    (
        "親が病気になってから関係が変わった",
        &["家族", "親子関係", "介護", "病気", "親", "夫", "妻"],
    ),
    (
        "夫が育児に非協力的",
        &["家族", "夫婦関係", "子育て", "夫", "妻", "仕事", "お金"],
    ),
    (
        "子どもの進路について意見が合わない",
        &["家族", "子育て", "進路", "子", "親"],
    ),
    (
        "家族に秘密があって打ち明けられない",
        &["家族", "秘密・打ち明け", "孤独"],
    ),
    (
        "共働きなのに育児が私ばかり",
        &["家族", "共働き・家事", "子育て", "夫", "妻", "仕事", "お金"],
    ),
    (
        "親からのプレッシャーがつらい",
        &["家族", "親子関係", "プレッシャー", "親"],
    ),
    (
        "家族に頼れない自分が情けない",
        &["家族", "孤独", "プレッシャー"],
    ),
    (
        "家庭内の会話が減って不安です",
        &["家族", "家庭内不和", "孤独"],
    ),
];

/// Thread service
pub struct ThreadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ThreadService<'a> {
    /// Create a new ThreadService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a thread, using the lowest slug index that is still free
    #[instrument(skip(self, request))]
    pub async fn create_thread(&self, request: CreateThreadRequest) -> ServiceResult<ThreadResponse> {
        request.validate()?;

        let title = request.title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        let mut tags: Vec<String> = Vec::with_capacity(request.tags.len());
        for tag in request.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let threads = self.ctx.thread_repo();
        for index in 0..MAX_SLUG_INDEX {
            let slug = slugify(title, index);
            if threads.find_by_slug(&slug).await?.is_some() {
                debug!(slug = %slug, "Slug taken");
                continue;
            }

            let thread = Thread::new(ThreadId::generate(), title.to_string(), tags, index);
            threads.create(&thread).await?;

            info!(thread_id = %thread.id, slug = %thread.slug, "Thread created");
            return Ok(ThreadResponse::from(thread));
        }

        Err(ServiceError::conflict(format!(
            "no free slug for title {title:?}"
        )))
    }

    /// Find a thread by its slug
    #[instrument(skip(self))]
    pub async fn find_by_slug(&self, slug: &str) -> ServiceResult<ThreadResponse> {
        let thread = self
            .ctx
            .thread_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::ThreadSlugNotFound(slug.to_string()))?;

        Ok(ThreadResponse::from(thread))
    }

    /// One page of threads
    #[instrument(skip(self))]
    pub async fn list(&self, sort: ThreadSort, offset: i64) -> ServiceResult<Page<ThreadResponse>> {
        let limit = self.ctx.feed_config().thread_page_size;
        let threads = self
            .ctx
            .thread_repo()
            .list(ThreadQuery::new(sort, limit).after(offset))
            .await?;

        Ok(Page::new(
            threads.into_iter().map(ThreadResponse::from).collect(),
            offset,
            limit,
        ))
    }

    /// Create any starter thread whose slug does not exist yet
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> ServiceResult<SeedReport> {
        let threads = self.ctx.thread_repo();
        let mut report = SeedReport::default();

        for (index, (title, tags)) in STARTER_THREADS.iter().enumerate() {
            let slug = slugify(title, index);
            if threads.find_by_slug(&slug).await?.is_some() {
                report.skipped += 1;
                continue;
            }

            let thread = Thread::new(
                ThreadId::generate(),
                (*title).to_string(),
                tags.iter().map(|t| (*t).to_string()).collect(),
                index,
            );
            threads.create(&thread).await?;
            report.created.push(thread.slug);
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped,
            "Starter threads seeded"
        );
        Ok(report)
    }
}

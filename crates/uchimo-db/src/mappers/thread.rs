//! Thread model -> entity mapper

use uchimo_core::{DomainError, Thread, ThreadId};

use super::corrupt_column;
use crate::models::ThreadModel;

impl TryFrom<ThreadModel> for Thread {
    type Error = DomainError;

    fn try_from(model: ThreadModel) -> Result<Self, Self::Error> {
        Ok(Thread {
            id: ThreadId::parse(model.id).map_err(corrupt_column("threads.id"))?,
            slug: model.slug,
            title: model.title,
            tags: model.tags,
            post_count: model.post_count,
            created_at: model.created_at,
        })
    }
}

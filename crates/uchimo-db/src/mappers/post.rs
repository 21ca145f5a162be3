//! Post model -> entity mapper

use uchimo_core::{DomainError, Post, PostId, ThreadId, UserId};

use super::corrupt_column;
use crate::models::PostModel;

impl TryFrom<PostModel> for Post {
    type Error = DomainError;

    fn try_from(model: PostModel) -> Result<Self, Self::Error> {
        Ok(Post {
            id: PostId::parse(model.id).map_err(corrupt_column("posts.id"))?,
            thread_id: ThreadId::parse(model.thread_id).map_err(corrupt_column("posts.thread_id"))?,
            author_id: UserId::parse(model.author_id).map_err(corrupt_column("posts.author_id"))?,
            content: model.content,
            likes_uchimo: model.likes_uchimo,
            likes_gambarou: model.likes_gambarou,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_post_from_model() {
        let model = PostModel {
            id: "p1".to_string(),
            thread_id: "t1".to_string(),
            author_id: "u1".to_string(),
            content: "hello".to_string(),
            likes_uchimo: 3,
            likes_gambarou: 1,
            created_at: Utc::now(),
        };

        let post = Post::try_from(model).unwrap();
        assert_eq!(post.id.as_str(), "p1");
        assert_eq!(post.likes_uchimo, 3);
        assert_eq!(post.likes_gambarou, 1);
    }

    #[test]
    fn test_empty_id_is_corrupt_row() {
        let model = PostModel {
            id: String::new(),
            thread_id: "t1".to_string(),
            author_id: "u1".to_string(),
            content: "hello".to_string(),
            likes_uchimo: 0,
            likes_gambarou: 0,
            created_at: Utc::now(),
        };

        let err = Post::try_from(model).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}

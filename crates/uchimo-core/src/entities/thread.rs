//! Thread entity - a discussion topic that collects posts

use chrono::{DateTime, Utc};

use crate::value_objects::ThreadId;

/// Thread entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub id: ThreadId,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
    pub post_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// Create a new thread; `index` disambiguates slugs of similar titles
    pub fn new(id: ThreadId, title: String, tags: Vec<String>, index: usize) -> Self {
        let slug = slugify(&title, index);
        Self {
            id,
            slug,
            title,
            tags,
            post_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// Derive a URL slug from a title
///
/// Whitespace runs and long-vowel/dash marks become `-`, anything that is
/// not a letter, digit, or `-` is dropped, and `-{index}` is appended.
pub fn slugify(title: &str, index: usize) -> String {
    let mut slug = String::with_capacity(title.len() + 4);
    let mut in_space = false;

    for c in title.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;

        match c {
            'ー' | '－' | '―' | '-' => slug.push('-'),
            c if c.is_alphanumeric() => slug.extend(c.to_lowercase()),
            _ => {}
        }
    }

    format!("{slug}-{index}")
}

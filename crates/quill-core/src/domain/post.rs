use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog article, draft or published.
///
/// `slug` is derived from the title and unique across all posts.
/// `published_at` is set on the first unpublished-to-published transition
/// and cleared again when the post is unpublished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub read_time: String,
    pub views: i32,
    pub likes: i32,
    pub comments_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// A post row joined with the names of its categories.
#[derive(Debug, Clone)]
pub struct PostWithCategories {
    pub post: Post,
    pub categories: Vec<String>,
}

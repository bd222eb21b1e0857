use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, PostWithCategories};
use crate::error::RepoError;

/// Listing window for posts.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub limit: u64,
    pub offset: u64,
}

/// Fields for inserting a post. The slug and read time are computed by
/// the caller before the row reaches the repository.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_name: String,
    pub author_username: String,
    pub read_time: String,
    pub category_ids: Vec<Uuid>,
}

/// Partial update for a post. `None` leaves a column untouched.
/// `published_at` nests an Option so the column can also be cleared.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
    pub read_time: Option<String>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub content: String,
}

/// Post repository.
///
/// `create` and `update` rewrite the category join rows inside the same
/// transaction as the post row, so partial writes are never observable.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List posts newest-first, joined with their category names.
    async fn list(&self, filter: PostFilter) -> Result<Vec<PostWithCategories>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostWithCategories>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError>;

    /// Whether a slug is already taken, optionally ignoring one record
    /// (the record being updated).
    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError>;

    async fn create(&self, input: NewPost) -> Result<Post, RepoError>;

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepoError>;

    /// Delete a post; comments and join rows cascade at the store level.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;

    async fn increment_likes(&self, id: Uuid) -> Result<(), RepoError>;

    /// Case-insensitive substring search over title and content,
    /// restricted to published posts, newest-first.
    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List categories ordered by name.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    /// Case-insensitive name lookup, optionally ignoring one record.
    async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, RepoError>;

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError>;

    async fn create(&self, input: NewCategory) -> Result<Category, RepoError>;

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Comment repository.
///
/// Creation and deletion keep the owning post's `comments_count` in step
/// within a single transaction.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Flat comment rows for a post, newest-first.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError>;

    async fn create(&self, input: NewComment) -> Result<Comment, RepoError>;

    /// Delete a comment and its whole descendant subtree, decrementing
    /// the post counter by the subtree size. Returns the removed count.
    async fn delete_subtree(&self, id: Uuid) -> Result<u64, RepoError>;

    async fn increment_likes(&self, id: Uuid) -> Result<(), RepoError>;
}

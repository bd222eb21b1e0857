//! Data Transfer Objects - request/response types for the API.
//!
//! Wire names are camelCase to match the JavaScript front end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Query parameters for the post listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPostsQuery {
    pub published: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Query parameters for post search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub published: Option<bool>,
    pub category_ids: Option<Vec<Uuid>>,
}

/// Upsert payload for the editor's periodic draft save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftRequest {
    pub id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TogglePublishRequest {
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreatedResponse {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSavedResponse {
    pub id: Uuid,
}

/// Author display fields denormalized onto posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub name: String,
    pub username: String,
    pub avatar: Option<String>,
}

/// A post shaped for display: author object, relative dates, category
/// names as tags. List views truncate `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub author: AuthorResponse,
    pub read_time: String,
    pub published_at: String,
    pub tags: Vec<String>,
    pub likes: i32,
    pub comments: i32,
    pub views: i32,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub published_at: String,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub posts_count: i32,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// A comment with its nested replies, shaped for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub author: AuthorResponse,
    pub content: String,
    pub timestamp: String,
    pub likes: i32,
    pub replies: Vec<CommentNode>,
}

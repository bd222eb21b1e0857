use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - a flat row with an optional parent reference.
///
/// The parent, when present, must belong to the same post. Nested reply
/// structure is reconstructed from flat rows by [`super::build_tree`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar: Option<String>,
    pub content: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

//! Comment entity for SeaORM.
//!
//! `parent_id` is a self-reference without a foreign key; subtree cleanup
//! is performed by the repository rather than by the store.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::ports::NewComment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    #[sea_orm(nullable)]
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_username: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub author_avatar: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub likes: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            parent_id: model.parent_id,
            author_name: model.author_name,
            author_username: model.author_username,
            author_avatar: model.author_avatar,
            content: model.content,
            likes: model.likes,
            created_at: model.created_at.into(),
        }
    }
}

impl From<NewComment> for ActiveModel {
    fn from(input: NewComment) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            post_id: Set(input.post_id),
            parent_id: Set(input.parent_id),
            author_name: Set(input.author_name),
            author_username: Set(input.author_username),
            author_avatar: Set(input.author_avatar),
            content: Set(input.content),
            likes: Set(0),
            created_at: Set(Utc::now().into()),
        }
    }
}

//! Post entity for SeaORM.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::ports::NewPost;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_image: Option<String>,
    pub published: bool,
    pub author_name: String,
    pub author_username: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub author_avatar: Option<String>,
    pub read_time: String,
    pub views: i32,
    pub likes: i32,
    pub comments_count: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub published_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::post_category::Entity")]
    PostCategories,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_category::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            excerpt: model.excerpt,
            cover_image: model.cover_image,
            published: model.published,
            author_name: model.author_name,
            author_username: model.author_username,
            author_avatar: model.author_avatar,
            read_time: model.read_time,
            views: model.views,
            likes: model.likes,
            comments_count: model.comments_count,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            published_at: model.published_at.map(Into::into),
        }
    }
}

/// Conversion from an insert request to a fresh ActiveModel. Category
/// join rows are the repository's job and are ignored here.
impl From<NewPost> for ActiveModel {
    fn from(input: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            slug: Set(input.slug),
            content: Set(input.content),
            excerpt: Set(input.excerpt),
            cover_image: Set(input.cover_image),
            published: Set(input.published),
            author_name: Set(input.author_name),
            author_username: Set(input.author_username),
            author_avatar: Set(None),
            read_time: Set(input.read_time),
            views: Set(0),
            likes: Set(0),
            comments_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            published_at: Set(input.published.then(|| now.into())),
        }
    }
}

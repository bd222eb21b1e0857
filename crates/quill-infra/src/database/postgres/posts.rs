use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Post, PostWithCategories};
use quill_core::error::RepoError;
use quill_core::ports::{NewPost, PostFilter, PostPatch, PostRepository};

use super::map_db_err;
use crate::database::entity::category::Entity as CategoryEntity;
use crate::database::entity::post::{self, Entity as PostEntity};
use crate::database::entity::post_category::{self, Entity as PostCategoryEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Load category names for a batch of post rows in one join query.
    async fn attach_categories(
        &self,
        rows: Vec<post::Model>,
    ) -> Result<Vec<PostWithCategories>, RepoError> {
        let ids: Vec<Uuid> = rows.iter().map(|m| m.id).collect();

        let mut names: HashMap<Uuid, Vec<String>> = HashMap::new();
        if !ids.is_empty() {
            let joins = PostCategoryEntity::find()
                .filter(post_category::Column::PostId.is_in(ids))
                .find_also_related(CategoryEntity)
                .all(&self.db)
                .await
                .map_err(map_db_err)?;

            for (join, category) in joins {
                if let Some(category) = category {
                    names.entry(join.post_id).or_default().push(category.name);
                }
            }
        }

        Ok(rows
            .into_iter()
            .map(|model| {
                let categories = names.remove(&model.id).unwrap_or_default();
                PostWithCategories {
                    post: model.into(),
                    categories,
                }
            })
            .collect())
    }

    async fn find_one(
        &self,
        model: Option<post::Model>,
    ) -> Result<Option<PostWithCategories>, RepoError> {
        match model {
            Some(model) => {
                let mut shaped = self.attach_categories(vec![model]).await?;
                Ok(shaped.pop())
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, filter: PostFilter) -> Result<Vec<PostWithCategories>, RepoError> {
        let mut query = PostEntity::find().order_by_desc(post::Column::CreatedAt);

        if let Some(published) = filter.published {
            query = query.filter(post::Column::Published.eq(published));
        }

        let rows = query
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.attach_categories(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostWithCategories>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        self.find_one(model).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError> {
        let model = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        self.find_one(model).await
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            query = query.filter(post::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn create(&self, input: NewPost) -> Result<Post, RepoError> {
        let category_ids = input.category_ids.clone();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let active: post::ActiveModel = input.into();
        let model = active.insert(&txn).await.map_err(map_db_err)?;

        if !category_ids.is_empty() {
            let links = category_ids
                .into_iter()
                .map(|category_id| post_category::ActiveModel {
                    post_id: Set(model.id),
                    category_id: Set(category_id),
                });
            PostCategoryEntity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let existing = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active = existing.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(slug) = patch.slug {
            active.slug = Set(slug);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(excerpt) = patch.excerpt {
            active.excerpt = Set(Some(excerpt));
        }
        if let Some(cover_image) = patch.cover_image {
            active.cover_image = Set(Some(cover_image));
        }
        if let Some(published) = patch.published {
            active.published = Set(published);
        }
        if let Some(read_time) = patch.read_time {
            active.read_time = Set(read_time);
        }
        if let Some(published_at) = patch.published_at {
            active.published_at = Set(published_at.map(Into::into));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&txn).await.map_err(map_db_err)?;

        if let Some(category_ids) = patch.category_ids {
            PostCategoryEntity::delete_many()
                .filter(post_category::Column::PostId.eq(id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;

            if !category_ids.is_empty() {
                let links = category_ids
                    .into_iter()
                    .map(|category_id| post_category::ActiveModel {
                        post_id: Set(id),
                        category_id: Set(category_id),
                    });
                PostCategoryEntity::insert_many(links)
                    .exec(&txn)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn increment_likes(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Likes, Expr::col(post::Column::Likes).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
        let pattern = format!("%{}%", super::escape_like(query));

        let rows = PostEntity::find()
            .filter(post::Column::Published.eq(true))
            .filter(
                Condition::any()
                    .add(Expr::col(post::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(post::Column::Content).ilike(pattern)),
            )
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

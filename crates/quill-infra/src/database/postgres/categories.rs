use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use quill_core::domain::Category;
use quill_core::error::RepoError;
use quill_core::ports::{CategoryPatch, CategoryRepository, NewCategory};

use super::map_db_err;
use crate::database::entity::category::{self, Entity as CategoryEntity};

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let rows = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let model = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, RepoError> {
        let mut query = CategoryEntity::find().filter(
            Expr::expr(Func::lower(Expr::col(category::Column::Name))).eq(name.to_lowercase()),
        );
        if let Some(id) = exclude {
            query = query.filter(category::Column::Id.ne(id));
        }

        let model = query.one(&self.db).await.map_err(map_db_err)?;
        Ok(model.map(Into::into))
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let mut query = CategoryEntity::find().filter(category::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            query = query.filter(category::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await.map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn create(&self, input: NewCategory) -> Result<Category, RepoError> {
        let active: category::ActiveModel = input.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, RepoError> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active = existing.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(slug) = patch.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CategoryEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

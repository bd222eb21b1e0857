use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, NewComment};

use super::map_db_err;
use crate::database::entity::comment::{self, Entity as CommentEntity};
use crate::database::entity::post::{self, Entity as PostEntity};

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let model = CommentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, input: NewComment) -> Result<Comment, RepoError> {
        let post_id = input.post_id;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let active: comment::ActiveModel = input.into();
        let model = active.insert(&txn).await.map_err(map_db_err)?;

        let updated = PostEntity::update_many()
            .col_expr(
                post::Column::CommentsCount,
                Expr::col(post::Column::CommentsCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if updated.rows_affected == 0 {
            // Dropping the transaction rolls the insert back.
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete_subtree(&self, id: Uuid) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let root = CommentEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;
        let post_id = root.post_id;

        // Breadth-first walk over parent references; parent_id carries no
        // foreign key, so the store cannot cascade this for us.
        let mut all_ids = vec![root.id];
        let mut frontier = vec![root.id];
        while !frontier.is_empty() {
            let children: Vec<Uuid> = CommentEntity::find()
                .filter(comment::Column::ParentId.is_in(frontier))
                .all(&txn)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|c| c.id)
                .collect();

            all_ids.extend(&children);
            frontier = children;
        }

        let removed = CommentEntity::delete_many()
            .filter(comment::Column::Id.is_in(all_ids))
            .exec(&txn)
            .await
            .map_err(map_db_err)?
            .rows_affected;

        PostEntity::update_many()
            .col_expr(
                post::Column::CommentsCount,
                Expr::col(post::Column::CommentsCount).sub(removed as i32),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(removed)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<(), RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(
                comment::Column::Likes,
                Expr::col(comment::Column::Likes).add(1),
            )
            .filter(comment::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

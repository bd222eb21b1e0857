//! Comment service - threaded reading, replies, subtree deletion.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::content::format_comment_timestamp;
use quill_core::domain::{CommentThread, build_tree};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{CommentRepository, NewComment};
use quill_shared::dto::{AuthorResponse, CommentNode, CreateCommentRequest};

#[derive(Clone)]
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    /// Nested threads for a post, newest root first.
    pub async fn get_by_post(&self, post_id: Uuid) -> Result<Vec<CommentNode>, DomainError> {
        let flat = self.repo.list_by_post(post_id).await?;
        Ok(build_tree(flat).into_iter().map(shape_thread).collect())
    }

    /// Add a comment or reply. A reply's parent must exist and belong
    /// to the same post.
    pub async fn create(
        &self,
        post_id: Uuid,
        req: CreateCommentRequest,
    ) -> Result<CommentNode, DomainError> {
        if let Some(parent_id) = req.parent_id {
            let parent = self
                .repo
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| DomainError::not_found("comment", parent_id))?;

            if parent.post_id != post_id {
                return Err(DomainError::Validation(
                    "parent comment belongs to a different post".to_owned(),
                ));
            }
        }

        let comment = self
            .repo
            .create(NewComment {
                post_id,
                parent_id: req.parent_id,
                author_name: req.author_name,
                author_username: req.author_username,
                author_avatar: req.author_avatar,
                content: req.content,
            })
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("post", post_id),
                other => other.into(),
            })?;

        Ok(shape_thread(CommentThread {
            comment,
            replies: Vec::new(),
        }))
    }

    /// Delete a comment and its whole reply subtree. Returns how many
    /// comments were removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, DomainError> {
        self.repo.delete_subtree(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("comment", id),
            other => other.into(),
        })
    }

    pub async fn like(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.increment_likes(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("comment", id),
            other => other.into(),
        })
    }
}

fn shape_thread(thread: CommentThread) -> CommentNode {
    let comment = thread.comment;
    CommentNode {
        id: comment.id,
        author: AuthorResponse {
            name: comment.author_name,
            username: comment.author_username,
            avatar: comment.author_avatar,
        },
        content: comment.content,
        timestamp: format_comment_timestamp(comment.created_at),
        likes: comment.likes,
        replies: thread.replies.into_iter().map(shape_thread).collect(),
    }
}

#[cfg(test)]
mod tests {
    use quill_core::ports::{NewPost, PostRepository};
    use quill_infra::InMemoryStore;

    use super::*;

    async fn seed_post(store: &Arc<InMemoryStore>, slug: &str) -> Uuid {
        let post = PostRepository::create(
            store.as_ref(),
            NewPost {
                title: slug.to_owned(),
                slug: slug.to_owned(),
                content: "body".to_owned(),
                excerpt: None,
                cover_image: None,
                published: true,
                author_name: "Anonymous".to_owned(),
                author_username: "anonymous".to_owned(),
                read_time: "1 min read".to_owned(),
                category_ids: Vec::new(),
            },
        )
        .await
        .unwrap();
        post.id
    }

    fn comment_req(content: &str, parent_id: Option<Uuid>) -> CreateCommentRequest {
        CreateCommentRequest {
            content: content.to_owned(),
            author_name: "Reader".to_owned(),
            author_username: "reader".to_owned(),
            author_avatar: None,
            parent_id,
        }
    }

    #[tokio::test]
    async fn replies_nest_under_their_parent() {
        let store = Arc::new(InMemoryStore::new());
        let post_id = seed_post(&store, "threaded").await;
        let svc = CommentService::new(store.clone());

        let root = svc.create(post_id, comment_req("root", None)).await.unwrap();
        svc.create(post_id, comment_req("reply", Some(root.id)))
            .await
            .unwrap();

        let threads = svc.get_by_post(post_id).await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(threads[0].replies[0].content, "reply");
    }

    #[tokio::test]
    async fn cross_post_parent_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let post_a = seed_post(&store, "post-a").await;
        let post_b = seed_post(&store, "post-b").await;
        let svc = CommentService::new(store.clone());

        let root = svc.create(post_a, comment_req("root", None)).await.unwrap();
        let err = svc
            .create(post_b, comment_req("stray", Some(root.id)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_parent_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let post_id = seed_post(&store, "lonely").await;
        let svc = CommentService::new(store.clone());

        let err = svc
            .create(post_id, comment_req("stray", Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity: "comment",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn subtree_delete_removes_descendants_and_counter() {
        let store = Arc::new(InMemoryStore::new());
        let post_id = seed_post(&store, "cascade").await;
        let svc = CommentService::new(store.clone());

        let root = svc.create(post_id, comment_req("root", None)).await.unwrap();
        let child = svc
            .create(post_id, comment_req("child", Some(root.id)))
            .await
            .unwrap();
        svc.create(post_id, comment_req("grandchild", Some(child.id)))
            .await
            .unwrap();

        let removed = svc.delete(root.id).await.unwrap();
        assert_eq!(removed, 3);
        assert!(svc.get_by_post(post_id).await.unwrap().is_empty());

        let post = PostRepository::find_by_id(store.as_ref(), post_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.post.comments_count, 0);
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let svc = CommentService::new(store);

        let err = svc
            .create(Uuid::new_v4(), comment_req("void", None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "post", .. }));
    }
}

//! In-memory repository backend - used as the fallback when no database
//! is configured, and by service-level tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Post, PostWithCategories};
use quill_core::error::RepoError;
use quill_core::ports::{
    CategoryPatch, CategoryRepository, CommentRepository, NewCategory, NewComment, NewPost,
    PostFilter, PostPatch, PostRepository,
};

#[derive(Default)]
struct Store {
    posts: HashMap<Uuid, Post>,
    post_categories: HashMap<Uuid, Vec<Uuid>>,
    categories: HashMap<Uuid, Category>,
    comments: HashMap<Uuid, Comment>,
}

impl Store {
    fn category_names(&self, post_id: Uuid) -> Vec<String> {
        self.post_categories
            .get(&post_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.categories.get(id))
                    .map(|c| c.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn shaped(&self, post: &Post) -> PostWithCategories {
        PostWithCategories {
            post: post.clone(),
            categories: self.category_names(post.id),
        }
    }
}

/// One store backing all three repositories, mirroring a single database.
///
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    store: RwLock<Store>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, filter: PostFilter) -> Result<Vec<PostWithCategories>, RepoError> {
        let store = self.store.read().await;

        let mut posts: Vec<&Post> = store
            .posts
            .values()
            .filter(|p| filter.published.is_none_or(|published| p.published == published))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|p| store.shaped(p))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostWithCategories>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).map(|p| store.shaped(p)))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostWithCategories>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .values()
            .find(|p| p.slug == slug)
            .map(|p| store.shaped(p)))
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .values()
            .any(|p| p.slug == slug && exclude != Some(p.id)))
    }

    async fn create(&self, input: NewPost) -> Result<Post, RepoError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            slug: input.slug,
            content: input.content,
            excerpt: input.excerpt,
            cover_image: input.cover_image,
            published: input.published,
            author_name: input.author_name,
            author_username: input.author_username,
            author_avatar: None,
            read_time: input.read_time,
            views: 0,
            likes: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
            published_at: input.published.then_some(now),
        };

        let mut store = self.store.write().await;
        store.post_categories.insert(post.id, input.category_ids);
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if let Some(category_ids) = patch.category_ids {
            if store.posts.contains_key(&id) {
                store.post_categories.insert(id, category_ids);
            }
        }

        let post = store.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(slug) = patch.slug {
            post.slug = slug;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(cover_image) = patch.cover_image {
            post.cover_image = Some(cover_image);
        }
        if let Some(published) = patch.published {
            post.published = published;
        }
        if let Some(read_time) = patch.read_time {
            post.read_time = read_time;
        }
        if let Some(published_at) = patch.published_at {
            post.published_at = published_at;
        }
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.posts.remove(&id).ok_or(RepoError::NotFound)?;
        store.post_categories.remove(&id);
        store.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let post = store.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.views += 1;
        Ok(())
    }

    async fn increment_likes(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let post = store.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.likes += 1;
        Ok(())
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
        let needle = query.to_lowercase();
        let store = self.store.read().await;

        let mut hits: Vec<&Post> = store
            .posts
            .values()
            .filter(|p| {
                p.published
                    && (p.title.to_lowercase().contains(&needle)
                        || p.content.to_lowercase().contains(&needle))
            })
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(hits
            .into_iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let store = self.store.read().await;
        let mut categories: Vec<Category> = store.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let store = self.store.read().await;
        Ok(store.categories.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, RepoError> {
        let needle = name.to_lowercase();
        let store = self.store.read().await;
        Ok(store
            .categories
            .values()
            .find(|c| c.name.to_lowercase() == needle && exclude != Some(c.id))
            .cloned())
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .values()
            .any(|c| c.slug == slug && exclude != Some(c.id)))
    }

    async fn create(&self, input: NewCategory) -> Result<Category, RepoError> {
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name,
            slug: input.slug,
            description: input.description,
            posts_count: 0,
            created_at: now,
            updated_at: now,
        };

        let mut store = self.store.write().await;
        store.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        let category = store.categories.get_mut(&id).ok_or(RepoError::NotFound)?;

        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(slug) = patch.slug {
            category.slug = slug;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        category.updated_at = Utc::now();

        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for ids in store.post_categories.values_mut() {
            ids.retain(|cid| *cid != id);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let store = self.store.read().await;
        let mut comments: Vec<Comment> = store
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let store = self.store.read().await;
        Ok(store.comments.get(&id).cloned())
    }

    async fn create(&self, input: NewComment) -> Result<Comment, RepoError> {
        let mut store = self.store.write().await;

        let post = store
            .posts
            .get_mut(&input.post_id)
            .ok_or(RepoError::NotFound)?;
        post.comments_count += 1;

        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: input.post_id,
            parent_id: input.parent_id,
            author_name: input.author_name,
            author_username: input.author_username,
            author_avatar: input.author_avatar,
            content: input.content,
            likes: 0,
            created_at: Utc::now(),
        };
        store.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete_subtree(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;

        let root = store.comments.get(&id).ok_or(RepoError::NotFound)?;
        let post_id = root.post_id;

        let mut all_ids = vec![id];
        let mut frontier = vec![id];
        while !frontier.is_empty() {
            let children: Vec<Uuid> = store
                .comments
                .values()
                .filter(|c| c.parent_id.is_some_and(|p| frontier.contains(&p)))
                .map(|c| c.id)
                .collect();
            all_ids.extend(&children);
            frontier = children;
        }

        for comment_id in &all_ids {
            store.comments.remove(comment_id);
        }

        let removed = all_ids.len() as u64;
        if let Some(post) = store.posts.get_mut(&post_id) {
            post.comments_count -= removed as i32;
        }

        Ok(removed)
    }

    async fn increment_likes(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let comment = store.comments.get_mut(&id).ok_or(RepoError::NotFound)?;
        comment.likes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, slug: &str, published: bool) -> NewPost {
        NewPost {
            title: title.to_owned(),
            slug: slug.to_owned(),
            content: "some words".to_owned(),
            excerpt: None,
            cover_image: None,
            published,
            author_name: "Anonymous".to_owned(),
            author_username: "anonymous".to_owned(),
            read_time: "1 min read".to_owned(),
            category_ids: Vec::new(),
        }
    }

    fn new_comment(post_id: Uuid, parent_id: Option<Uuid>) -> NewComment {
        NewComment {
            post_id,
            parent_id,
            author_name: "Ada".to_owned(),
            author_username: "ada".to_owned(),
            author_avatar: None,
            content: "hi".to_owned(),
        }
    }

    #[tokio::test]
    async fn slug_exists_honors_exclusion() {
        let store = InMemoryStore::new();
        let post = PostRepository::create(&store, new_post("One", "one", true))
            .await
            .unwrap();

        assert!(
            PostRepository::slug_exists(&store, "one", None)
                .await
                .unwrap()
        );
        assert!(
            !PostRepository::slug_exists(&store, "one", Some(post.id))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn subtree_delete_decrements_counter_by_subtree_size() {
        let store = InMemoryStore::new();
        let post = PostRepository::create(&store, new_post("One", "one", true))
            .await
            .unwrap();

        let root = CommentRepository::create(&store, new_comment(post.id, None))
            .await
            .unwrap();
        let child = CommentRepository::create(&store, new_comment(post.id, Some(root.id)))
            .await
            .unwrap();
        CommentRepository::create(&store, new_comment(post.id, Some(child.id)))
            .await
            .unwrap();

        let shaped = PostRepository::find_by_id(&store, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shaped.post.comments_count, 3);

        let removed = store.delete_subtree(root.id).await.unwrap();
        assert_eq!(removed, 3);

        let shaped = PostRepository::find_by_id(&store, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shaped.post.comments_count, 0);
        assert!(store.list_by_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_published_posts_only() {
        let store = InMemoryStore::new();
        let mut hidden = new_post("Hidden React Tricks", "hidden-react-tricks", false);
        hidden.content = "react internals".to_owned();
        PostRepository::create(&store, hidden).await.unwrap();
        PostRepository::create(&store, new_post("React Basics", "react-basics", true))
            .await
            .unwrap();

        let hits = PostRepository::search(&store, "react", 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "React Basics");
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let store = InMemoryStore::new();
        let err = CommentRepository::create(&store, new_comment(Uuid::new_v4(), None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }
}

//! Post service - lifecycle, slugs, search, and display shaping.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use quill_core::content::{calculate_read_time, ensure_unique_slug, format_relative_date, generate_slug};
use quill_core::domain::{Post, PostWithCategories};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{NewPost, PostFilter, PostPatch, PostRepository};
use quill_shared::dto::{
    AuthorResponse, CreatePostRequest, DraftSavedResponse, ListPostsQuery, PostCreatedResponse,
    PostResponse, SaveDraftRequest, SearchResultResponse, UpdatePostRequest,
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;
const DEFAULT_SEARCH_LIMIT: u64 = 10;

/// List views carry a content prefix rather than the full body.
const LIST_CONTENT_CHARS: usize = 300;
/// Excerpt fallback length when the author supplied none.
const EXCERPT_CHARS: usize = 200;

/// Author fields applied when a request carries none. The platform has
/// no account system; bylines are denormalized display strings.
const DEFAULT_AUTHOR_NAME: &str = "Anonymous";
const DEFAULT_AUTHOR_USERNAME: &str = "anonymous";

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// List posts newest-first. Limit defaults to 20 and is clamped to
    /// at most 100; offset defaults to 0.
    pub async fn list(&self, query: ListPostsQuery) -> Result<Vec<PostResponse>, DomainError> {
        let filter = PostFilter {
            published: query.published,
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: query.offset.unwrap_or(0),
        };

        let rows = self.repo.list(filter).await?;
        Ok(rows.into_iter().map(|row| shape_post(row, false)).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PostResponse, DomainError> {
        let row = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;

        Ok(shape_post(row, true))
    }

    /// Fetch a post by slug for the reading view. The view counter is
    /// bumped off the request path; a failed bump is logged and dropped.
    pub async fn get_by_slug(&self, slug: &str) -> Result<PostResponse, DomainError> {
        let row = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("post", slug))?;

        let repo = self.repo.clone();
        let id = row.post.id;
        tokio::spawn(async move {
            if let Err(e) = repo.increment_views(id).await {
                tracing::warn!(post_id = %id, "view increment failed: {}", e);
            }
        });

        Ok(shape_post(row, true))
    }

    pub async fn create(&self, req: CreatePostRequest) -> Result<PostCreatedResponse, DomainError> {
        let slug = self.unique_slug(&req.title, None).await?;
        let read_time = calculate_read_time(&req.content);

        let post = self
            .repo
            .create(NewPost {
                title: req.title,
                slug,
                content: req.content,
                excerpt: req.excerpt,
                cover_image: req.cover_image,
                published: req.published,
                author_name: DEFAULT_AUTHOR_NAME.to_owned(),
                author_username: DEFAULT_AUTHOR_USERNAME.to_owned(),
                read_time,
                category_ids: req.category_ids.unwrap_or_default(),
            })
            .await?;

        Ok(PostCreatedResponse {
            id: post.id,
            slug: post.slug,
        })
    }

    /// Partial update. The slug is recomputed only when the title
    /// actually changes, the read time only when the content does, and
    /// `published_at` only on a publish-state transition.
    pub async fn update(&self, id: Uuid, req: UpdatePostRequest) -> Result<PostResponse, DomainError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?
            .post;

        let patch = self.build_patch(&existing, req).await?;
        self.apply_patch(id, patch).await
    }

    /// Upsert used by the editor's periodic save. Always lands the post
    /// unpublished, clearing `published_at` if it was live.
    pub async fn save_draft(&self, req: SaveDraftRequest) -> Result<DraftSavedResponse, DomainError> {
        match req.id {
            Some(id) => {
                let existing = self
                    .repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("post", id))?
                    .post;

                let mut patch = self
                    .build_patch(
                        &existing,
                        UpdatePostRequest {
                            title: Some(req.title),
                            content: Some(req.content),
                            excerpt: req.excerpt,
                            cover_image: req.cover_image,
                            published: Some(false),
                            category_ids: req.category_ids,
                        },
                    )
                    .await?;
                // A draft save never leaves the post published.
                patch.published = Some(false);

                self.apply_patch(id, patch).await?;
                Ok(DraftSavedResponse { id })
            }
            None => {
                let created = self
                    .create(CreatePostRequest {
                        title: req.title,
                        content: req.content,
                        excerpt: req.excerpt,
                        cover_image: req.cover_image,
                        published: false,
                        category_ids: req.category_ids,
                    })
                    .await?;
                Ok(DraftSavedResponse { id: created.id })
            }
        }
    }

    pub async fn toggle_publish(&self, id: Uuid, published: bool) -> Result<PostResponse, DomainError> {
        self.update(
            id,
            UpdatePostRequest {
                published: Some(published),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", id),
            other => other.into(),
        })
    }

    /// Bump the like counter. Repeat likes from the same reader are
    /// counted again; there is no identity to dedupe on.
    pub async fn like(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.increment_likes(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", id),
            other => other.into(),
        })
    }

    /// Published-only substring search over titles and bodies.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<u64>,
    ) -> Result<Vec<SearchResultResponse>, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_PAGE_SIZE);
        let posts = self.repo.search(query, limit).await?;

        Ok(posts
            .into_iter()
            .map(|post| SearchResultResponse {
                id: post.id,
                title: post.title.clone(),
                slug: post.slug.clone(),
                excerpt: excerpt_of(&post),
                cover_image: post.cover_image.clone(),
                published_at: format_relative_date(post.published_at.unwrap_or(post.created_at)),
            })
            .collect())
    }

    async fn unique_slug(&self, title: &str, exclude: Option<Uuid>) -> Result<String, DomainError> {
        let base = generate_slug(title);
        // Titles made entirely of punctuation slug to nothing.
        let base = if base.is_empty() { "post".to_owned() } else { base };

        let repo = self.repo.clone();
        let slug = ensure_unique_slug(&base, move |candidate| {
            let repo = repo.clone();
            async move { repo.slug_exists(&candidate, exclude).await }
        })
        .await?;

        Ok(slug)
    }

    async fn build_patch(
        &self,
        existing: &Post,
        req: UpdatePostRequest,
    ) -> Result<PostPatch, DomainError> {
        let mut patch = PostPatch::default();

        if let Some(title) = req.title {
            if title != existing.title {
                patch.slug = Some(self.unique_slug(&title, Some(existing.id)).await?);
            }
            patch.title = Some(title);
        }

        if let Some(content) = req.content {
            patch.read_time = Some(calculate_read_time(&content));
            patch.content = Some(content);
        }

        patch.excerpt = req.excerpt;
        patch.cover_image = req.cover_image;
        patch.category_ids = req.category_ids;

        if let Some(published) = req.published {
            if published != existing.published {
                patch.published_at = Some(published.then(Utc::now));
            }
            patch.published = Some(published);
        }

        Ok(patch)
    }

    async fn apply_patch(&self, id: Uuid, patch: PostPatch) -> Result<PostResponse, DomainError> {
        self.repo.update(id, patch).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", id),
            other => other.into(),
        })?;

        // Re-read joined with category names for the response shape.
        let row = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;

        Ok(shape_post(row, true))
    }
}

/// Shape a joined row for display: author object, relative date, tags.
/// List views truncate the body.
pub(crate) fn shape_post(row: PostWithCategories, full_content: bool) -> PostResponse {
    let PostWithCategories { post, categories } = row;

    let content = if full_content {
        post.content.clone()
    } else {
        truncate_chars(&post.content, LIST_CONTENT_CHARS)
    };

    PostResponse {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        content,
        excerpt: excerpt_of(&post),
        cover_image: post.cover_image.clone(),
        author: AuthorResponse {
            name: post.author_name.clone(),
            username: post.author_username.clone(),
            avatar: post.author_avatar.clone(),
        },
        read_time: post.read_time.clone(),
        published_at: format_relative_date(post.published_at.unwrap_or(post.created_at)),
        tags: categories,
        likes: post.likes,
        comments: post.comments_count,
        views: post.views,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn excerpt_of(post: &Post) -> String {
    match &post.excerpt {
        Some(excerpt) if !excerpt.is_empty() => excerpt.clone(),
        _ => truncate_chars(&post.content, EXCERPT_CHARS),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_owned()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use quill_infra::InMemoryStore;

    use super::*;

    fn service() -> PostService {
        PostService::new(Arc::new(InMemoryStore::new()))
    }

    fn create_req(title: &str, published: bool) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_owned(),
            content: "Some body text for the post.".to_owned(),
            excerpt: None,
            cover_image: None,
            published,
            category_ids: None,
        }
    }

    #[tokio::test]
    async fn create_derives_slug_and_read_time() {
        let svc = service();
        let created = svc.create(create_req("Hello, World!", true)).await.unwrap();
        assert_eq!(created.slug, "hello-world");

        let post = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(post.read_time, "1 min read");
        assert!(post.published);
    }

    #[tokio::test]
    async fn duplicate_titles_get_numbered_slugs() {
        let svc = service();
        let first = svc.create(create_req("My Post", false)).await.unwrap();
        let second = svc.create(create_req("My Post", false)).await.unwrap();
        assert_eq!(first.slug, "my-post");
        assert_eq!(second.slug, "my-post-1");
    }

    #[tokio::test]
    async fn publish_toggle_sets_clears_and_resets_published_at() {
        let store = Arc::new(InMemoryStore::new());
        let svc = PostService::new(store.clone());
        let created = svc.create(create_req("Draft", false)).await.unwrap();

        let raw_published_at = |store: &Arc<InMemoryStore>, id| {
            let store = store.clone();
            async move {
                quill_core::ports::PostRepository::find_by_id(store.as_ref(), id)
                    .await
                    .unwrap()
                    .unwrap()
                    .post
                    .published_at
            }
        };

        assert!(raw_published_at(&store, created.id).await.is_none());

        svc.toggle_publish(created.id, true).await.unwrap();
        let first = raw_published_at(&store, created.id).await.unwrap();

        svc.toggle_publish(created.id, false).await.unwrap();
        assert!(raw_published_at(&store, created.id).await.is_none());

        svc.toggle_publish(created.id, true).await.unwrap();
        let second = raw_published_at(&store, created.id).await.unwrap();
        assert!(second >= first);
    }

    #[tokio::test]
    async fn unchanged_title_keeps_slug_on_update() {
        let svc = service();
        let created = svc.create(create_req("Stable Title", false)).await.unwrap();

        let updated = svc
            .update(
                created.id,
                UpdatePostRequest {
                    title: Some("Stable Title".to_owned()),
                    content: Some("Rewritten body.".to_owned()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "stable-title");
        assert_eq!(updated.content, "Rewritten body.");
    }

    #[tokio::test]
    async fn save_draft_forces_unpublished() {
        let svc = service();
        let created = svc.create(create_req("Going Live", true)).await.unwrap();

        let saved = svc
            .save_draft(SaveDraftRequest {
                id: Some(created.id),
                title: "Going Live".to_owned(),
                content: "Edited while live.".to_owned(),
                excerpt: None,
                cover_image: None,
                category_ids: None,
            })
            .await
            .unwrap();
        assert_eq!(saved.id, created.id);

        let post = svc.get_by_id(created.id).await.unwrap();
        assert!(!post.published);
    }

    #[tokio::test]
    async fn save_draft_without_id_creates() {
        let svc = service();
        let saved = svc
            .save_draft(SaveDraftRequest {
                id: None,
                title: "Scratch".to_owned(),
                content: "wip".to_owned(),
                excerpt: None,
                cover_image: None,
                category_ids: None,
            })
            .await
            .unwrap();

        let post = svc.get_by_id(saved.id).await.unwrap();
        assert!(!post.published);
        assert_eq!(post.title, "Scratch");
    }

    #[tokio::test]
    async fn search_returns_only_published() {
        let svc = service();
        svc.create(create_req("Rust Tips", true)).await.unwrap();
        svc.create(create_req("Rust Drafts", false)).await.unwrap();

        let hits = svc.search("rust", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust Tips");
    }

    #[tokio::test]
    async fn get_by_slug_bumps_views_off_request_path() {
        let svc = service();
        let created = svc.create(create_req("Popular", true)).await.unwrap();

        let fetched = svc.get_by_slug(&created.slug).await.unwrap();
        assert_eq!(fetched.views, 0);

        // Let the spawned increment run.
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        let again = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(again.views, 1);
    }

    #[tokio::test]
    async fn list_truncates_content() {
        let svc = service();
        let long = "word ".repeat(200);
        svc.create(CreatePostRequest {
            title: "Long".to_owned(),
            content: long,
            excerpt: None,
            cover_image: None,
            published: true,
            category_ids: None,
        })
        .await
        .unwrap();

        let posts = svc
            .list(ListPostsQuery {
                published: Some(true),
                limit: None,
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].content.ends_with("..."));
        assert_eq!(posts[0].content.chars().count(), LIST_CONTENT_CHARS + 3);
    }

    #[tokio::test]
    async fn list_defaults_limit_to_twenty() {
        let store = Arc::new(InMemoryStore::new());
        let svc = PostService::new(store.clone());
        seed_posts(&store, 25).await;

        let posts = svc
            .list(ListPostsQuery {
                published: None,
                limit: None,
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(posts.len(), DEFAULT_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn list_clamps_oversized_limit() {
        let store = Arc::new(InMemoryStore::new());
        let svc = PostService::new(store.clone());
        seed_posts(&store, 105).await;

        let posts = svc
            .list(ListPostsQuery {
                published: None,
                limit: Some(500),
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(posts.len(), MAX_PAGE_SIZE as usize);
    }

    #[tokio::test]
    async fn list_defaults_offset_to_zero() {
        let store = Arc::new(InMemoryStore::new());
        let svc = PostService::new(store.clone());
        seed_posts(&store, 3).await;

        let all = svc
            .list(ListPostsQuery {
                published: None,
                limit: Some(100),
                offset: None,
            })
            .await
            .unwrap();
        let shifted = svc
            .list(ListPostsQuery {
                published: None,
                limit: Some(100),
                offset: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(shifted.len(), 2);
        assert_eq!(shifted[0].id, all[1].id);
    }

    async fn seed_posts(store: &Arc<InMemoryStore>, count: usize) {
        for i in 0..count {
            quill_core::ports::PostRepository::create(
                store.as_ref(),
                quill_core::ports::NewPost {
                    title: format!("Post {i}"),
                    slug: format!("post-{i}"),
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
        }
    }

    #[tokio::test]
    async fn like_on_missing_post_is_not_found() {
        let svc = service();
        let err = svc.like(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "post", .. }));
    }
}

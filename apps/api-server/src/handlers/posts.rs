//! Post handlers - listing, reading, authoring, publishing.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::{
    CreatePostRequest, ListPostsQuery, SaveDraftRequest, SearchQuery, TogglePublishRequest,
    UpdatePostRequest,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 255;
const MAX_PAGE_SIZE: u64 = 100;

/// GET /api/posts?published=&limit=&offset=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    if let Some(limit) = query.limit {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(vec![format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )]));
        }
    }

    let posts = state.posts.list(query).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/posts/slug/{slug}
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    validate_title(&req.title, &mut errors);
    if req.content.trim().is_empty() {
        errors.push("content must not be empty".to_owned());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let created = state.posts.create(req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(created)))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    if let Some(title) = &req.title {
        validate_title(title, &mut errors);
    }
    if let Some(content) = &req.content {
        if content.trim().is_empty() {
            errors.push("content must not be empty".to_owned());
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let post = state.posts.update(path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Post deleted")))
}

/// POST /api/posts/drafts
pub async fn save_draft(
    state: web::Data<AppState>,
    body: web::Json<SaveDraftRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Autosaved drafts may have an empty body, but never an empty title.
    let mut errors = Vec::new();
    validate_title(&req.title, &mut errors);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let saved = state.posts.save_draft(req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(saved)))
}

/// GET /api/posts/search?q=&limit=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let mut errors = Vec::new();
    if query.q.trim().is_empty() {
        errors.push("q must not be empty".to_owned());
    }
    if let Some(limit) = query.limit {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            errors.push(format!("limit must be between 1 and {MAX_PAGE_SIZE}"));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let results = state.posts.search(query.q.trim(), query.limit).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(())))
}

/// POST /api/posts/{id}/publish
pub async fn toggle_publish(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<TogglePublishRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .toggle_publish(path.into_inner(), body.published)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

fn validate_title(title: &str, errors: &mut Vec<String>) {
    if title.trim().is_empty() {
        errors.push("title must not be empty".to_owned());
    } else if title.chars().count() > MAX_TITLE_CHARS {
        errors.push(format!("title must be at most {MAX_TITLE_CHARS} characters"));
    }
}

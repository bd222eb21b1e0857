//! Comment handlers - threaded listing, replies, moderation.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::CreateCommentRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_AUTHOR_CHARS: usize = 100;

/// GET /api/posts/{post_id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let threads = state.comments.get_by_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(threads))
}

/// POST /api/posts/{post_id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    if req.content.trim().is_empty() {
        errors.push("content must not be empty".to_owned());
    }
    validate_author_field("authorName", &req.author_name, &mut errors);
    validate_author_field("authorUsername", &req.author_username, &mut errors);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let comment = state.comments.create(path.into_inner(), req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let removed = state.comments.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        removed,
        "Comment thread deleted",
    )))
}

/// POST /api/comments/{id}/like
pub async fn like_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.comments.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(())))
}

fn validate_author_field(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{field} must not be empty"));
    } else if value.chars().count() > MAX_AUTHOR_CHARS {
        errors.push(format!("{field} must be at most {MAX_AUTHOR_CHARS} characters"));
    }
}

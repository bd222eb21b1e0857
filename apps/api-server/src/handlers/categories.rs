//! Category handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::{CreateCategoryRequest, UpdateCategoryRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_NAME_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// GET /api/categories/{id}
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state.categories.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    validate_name(&req.name, &mut errors);
    validate_description(req.description.as_deref(), &mut errors);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let created = state.categories.create(req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(created)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    if let Some(name) = &req.name {
        validate_name(name, &mut errors);
    }
    validate_description(req.description.as_deref(), &mut errors);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let updated = state.categories.update(path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated)))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.categories.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "Category deleted")))
}

fn validate_name(name: &str, errors: &mut Vec<String>) {
    if name.trim().is_empty() {
        errors.push("name must not be empty".to_owned());
    } else if name.chars().count() > MAX_NAME_CHARS {
        errors.push(format!("name must be at most {MAX_NAME_CHARS} characters"));
    }
}

fn validate_description(description: Option<&str>, errors: &mut Vec<String>) {
    if let Some(description) = description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            errors.push(format!(
                "description must be at most {MAX_DESCRIPTION_CHARS} characters"
            ));
        }
    }
}
